//! Settings given on the command line.
//!
//! Filter flags take the literal wire values (e.g. `--damage '$500 OR LESS'`)
//! and are replayed as settings edits onto a fresh panel, so one-shot
//! commands see exactly the settings the interactive mode would build.

use clap::Args;
use crash_map_crash_models::{
    CauseCategory, CrashType, DamageLevel, FilterDomain, GroupBy, InjurySeverity,
    LightingCondition, RankType,
};
use crash_map_dashboard::FilterValue;
use crash_map_dashboard::panel::{SettingsEdit, SettingsPanel};
use crash_map_dashboard_models::{SettingsSnapshot, parse_date_input};

#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Ranking criterion: frequency, weighted or dangerous
    #[arg(long)]
    rank_type: Option<String>,

    /// Hot spot grouping: street or location
    #[arg(long)]
    group_by: Option<String>,

    /// Start date (YYYY-MM-DD); pass an empty string to clear it
    #[arg(long)]
    date_start: Option<String>,

    /// End date (YYYY-MM-DD); pass an empty string to clear it
    #[arg(long)]
    date_end: Option<String>,

    /// Damage bracket to include (repeatable)
    #[arg(long)]
    damage: Vec<String>,

    /// Crash type to include (repeatable)
    #[arg(long)]
    crash_type: Vec<String>,

    /// Injury severity to include (repeatable)
    #[arg(long = "injury")]
    injuries: Vec<String>,

    /// Contributory cause category to include (repeatable)
    #[arg(long)]
    cause: Vec<String>,

    /// Lighting condition to include (repeatable)
    #[arg(long)]
    lighting: Vec<String>,
}

impl SettingsArgs {
    /// Translates the flags into panel edits, in flag order.
    ///
    /// # Errors
    ///
    /// Returns an error naming the first flag whose value is not in its
    /// domain or is not a `YYYY-MM-DD` date.
    pub fn edits(&self) -> Result<Vec<SettingsEdit>, Box<dyn std::error::Error>> {
        let mut edits = Vec::new();

        if let Some(value) = &self.rank_type {
            let rank_type: RankType = value
                .parse()
                .map_err(|e| format!("invalid --rank-type {value:?}: {e}"))?;
            edits.push(SettingsEdit::RankType(rank_type));
        }
        if let Some(value) = &self.group_by {
            let group_by: GroupBy = value
                .parse()
                .map_err(|e| format!("invalid --group-by {value:?}: {e}"))?;
            edits.push(SettingsEdit::GroupBy(group_by));
        }
        if let Some(value) = &self.date_start {
            edits.push(SettingsEdit::DateStart(parse_date_input(value)?));
        }
        if let Some(value) = &self.date_end {
            edits.push(SettingsEdit::DateEnd(parse_date_input(value)?));
        }

        let groups: [(&str, &[String]); 5] = [
            (DamageLevel::PARAM, &self.damage),
            (CrashType::PARAM, &self.crash_type),
            (InjurySeverity::PARAM, &self.injuries),
            (CauseCategory::PARAM, &self.cause),
            (LightingCondition::PARAM, &self.lighting),
        ];
        for (param, values) in groups {
            for value in values {
                edits.push(SettingsEdit::Filter {
                    value: FilterValue::from_param(param, value)?,
                    checked: true,
                });
            }
        }

        Ok(edits)
    }

    /// Builds the settings the flags describe, starting from the defaults.
    ///
    /// # Errors
    ///
    /// See [`Self::edits`].
    pub fn snapshot(&self) -> Result<SettingsSnapshot, Box<dyn std::error::Error>> {
        let mut panel = SettingsPanel::new();
        for edit in self.edits()? {
            panel.apply(edit);
        }
        Ok(panel.snapshot())
    }
}
