//! Interactive dashboard session.
//!
//! A `dialoguer` menu loop over a [`Dashboard`]. After every action the
//! in-flight ranking fetches are settled behind a spinner and the view is
//! re-rendered.

use chrono::NaiveDate;
use crash_map_cli_utils::{LoadingSpinner, MultiProgress};
use crash_map_crash_models::{
    CauseCategory, CrashType, DamageLevel, FilterDomain, GroupBy, InjurySeverity,
    LightingCondition, RankType,
};
use crash_map_dashboard::FilterValue;
use crash_map_dashboard::app::Dashboard;
use crash_map_dashboard::panel::SettingsEdit;
use crash_map_dashboard::results::{Completion, LOADING_PLACEHOLDER};
use crash_map_dashboard_models::parse_date_input;
use dialoguer::{Input, MultiSelect, Select};

use crate::render::render_view;

/// Actions offered by the dashboard menu.
enum DashboardAction {
    RankType,
    GroupBy,
    DateStart,
    DateEnd,
    Filters,
    Reset,
    TogglePanel,
    Retry,
    Quit,
}

impl DashboardAction {
    const ALL: &[Self] = &[
        Self::RankType,
        Self::GroupBy,
        Self::DateStart,
        Self::DateEnd,
        Self::Filters,
        Self::Reset,
        Self::TogglePanel,
        Self::Retry,
        Self::Quit,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::RankType => "Change rank type",
            Self::GroupBy => "Change grouping",
            Self::DateStart => "Set start date",
            Self::DateEnd => "Set end date",
            Self::Filters => "Edit filters",
            Self::Reset => "Reset filters",
            Self::TogglePanel => "Show/hide rankings",
            Self::Retry => "Retry ranking fetch",
            Self::Quit => "Quit",
        }
    }
}

/// Checkbox groups in the settings panel.
enum FilterGroup {
    Damage,
    CrashType,
    Injury,
    Cause,
    Lighting,
}

impl FilterGroup {
    const ALL: &[Self] = &[
        Self::Damage,
        Self::CrashType,
        Self::Injury,
        Self::Cause,
        Self::Lighting,
    ];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Damage => DamageLevel::TITLE,
            Self::CrashType => CrashType::TITLE,
            Self::Injury => InjurySeverity::TITLE,
            Self::Cause => CauseCategory::TITLE,
            Self::Lighting => LightingCondition::TITLE,
        }
    }
}

/// Runs the interactive dashboard until the user quits.
///
/// # Errors
///
/// Returns an error if a prompt fails (e.g. the terminal is closed).
#[allow(clippy::future_not_send)]
pub async fn run(
    multi: &MultiProgress,
    mut dashboard: Dashboard,
) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = DashboardAction::ALL
        .iter()
        .map(DashboardAction::label)
        .collect();

    dashboard.mount();

    loop {
        settle(multi, &mut dashboard).await;
        print!("{}", render_view(dashboard.results()));

        let idx = Select::new()
            .with_prompt("Dashboard")
            .items(&labels)
            .default(0)
            .interact()?;

        match DashboardAction::ALL[idx] {
            DashboardAction::RankType => {
                if let Some(rank_type) = pick_rank_type(dashboard.panel().rank_type())? {
                    dashboard.edit(SettingsEdit::RankType(rank_type));
                }
            }
            DashboardAction::GroupBy => {
                if let Some(group_by) = pick_group_by(dashboard.panel().group_by())? {
                    dashboard.edit(SettingsEdit::GroupBy(group_by));
                }
            }
            DashboardAction::DateStart => {
                let current = dashboard.panel().filters().date_start;
                if let Some(date) = prompt_date("Start date", current)? {
                    dashboard.edit(SettingsEdit::DateStart(date));
                }
            }
            DashboardAction::DateEnd => {
                let current = dashboard.panel().filters().date_end;
                if let Some(date) = prompt_date("End date", current)? {
                    dashboard.edit(SettingsEdit::DateEnd(date));
                }
            }
            DashboardAction::Filters => edit_filters(&mut dashboard)?,
            DashboardAction::Reset => {
                dashboard.edit(SettingsEdit::Reset);
            }
            DashboardAction::TogglePanel => dashboard.toggle_panel(),
            DashboardAction::Retry => dashboard.retry(),
            DashboardAction::Quit => break,
        }
    }

    Ok(())
}

/// Applies ranking results until no fetch is in flight.
#[allow(clippy::future_not_send)]
async fn settle(multi: &MultiProgress, dashboard: &mut Dashboard) {
    if dashboard.in_flight() == 0 {
        return;
    }

    let spinner = LoadingSpinner::start(multi, LOADING_PLACEHOLDER);
    while let Some(completion) = dashboard.next_completion().await {
        if completion == Completion::Stale {
            spinner.set_message(format!(
                "{LOADING_PLACEHOLDER} ({} pending)",
                dashboard.in_flight()
            ));
        }
    }
    spinner.finish();
}

/// Returns `None` when the selection is unchanged.
fn pick_rank_type(current: RankType) -> Result<Option<RankType>, Box<dyn std::error::Error>> {
    let options = RankType::all();
    let labels: Vec<String> = options
        .iter()
        .map(|r| format!("{} - {}", r.label(), r.description()))
        .collect();
    let default = options.iter().position(|r| *r == current).unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Rank by")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(Some(options[idx]).filter(|r| *r != current))
}

fn pick_group_by(current: GroupBy) -> Result<Option<GroupBy>, Box<dyn std::error::Error>> {
    let options = GroupBy::all();
    let labels: Vec<&str> = options.iter().map(|g| g.label()).collect();
    let default = options.iter().position(|g| *g == current).unwrap_or(0);

    let idx = Select::new()
        .with_prompt("Group by")
        .items(&labels)
        .default(default)
        .interact()?;

    Ok(Some(options[idx]).filter(|g| *g != current))
}

/// Prompts for a date, pre-filled with `current`. An empty answer clears
/// the date; an unparseable one is reported and ignored.
fn prompt_date(
    prompt: &str,
    current: Option<NaiveDate>,
) -> Result<Option<Option<NaiveDate>>, Box<dyn std::error::Error>> {
    let text: String = Input::new()
        .with_prompt(format!("{prompt} (YYYY-MM-DD, empty to clear)"))
        .with_initial_text(current.map(|d| d.to_string()).unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;

    match parse_date_input(&text) {
        Ok(date) if date == current => Ok(None),
        Ok(date) => Ok(Some(date)),
        Err(e) => {
            println!("{e}");
            Ok(None)
        }
    }
}

fn edit_filters(dashboard: &mut Dashboard) -> Result<(), Box<dyn std::error::Error>> {
    let labels: Vec<&str> = FilterGroup::ALL.iter().map(FilterGroup::label).collect();
    let idx = Select::new()
        .with_prompt("Filter group")
        .items(&labels)
        .default(0)
        .interact()?;

    match FilterGroup::ALL[idx] {
        FilterGroup::Damage => edit_group(dashboard, FilterValue::Damage),
        FilterGroup::CrashType => edit_group(dashboard, FilterValue::CrashType),
        FilterGroup::Injury => edit_group(dashboard, FilterValue::Injury),
        FilterGroup::Cause => edit_group(dashboard, FilterValue::Cause),
        FilterGroup::Lighting => edit_group(dashboard, FilterValue::Lighting),
    }
}

/// Shows one checkbox group and applies an edit for every box whose state
/// changed.
fn edit_group<T: FilterDomain>(
    dashboard: &mut Dashboard,
    wrap: fn(T) -> FilterValue,
) -> Result<(), Box<dyn std::error::Error>> {
    let values = T::all();
    let labels: Vec<&str> = values.iter().map(|v| v.label()).collect();
    let before: Vec<bool> = values
        .iter()
        .map(|v| dashboard.panel().filters().contains(wrap(*v)))
        .collect();

    let chosen = MultiSelect::new()
        .with_prompt(format!("{} (space=toggle, enter=confirm)", T::TITLE))
        .items(&labels)
        .defaults(&before)
        .interact()?;

    for (i, value) in values.iter().enumerate() {
        let checked = chosen.contains(&i);
        if checked != before[i] {
            dashboard.edit(SettingsEdit::Filter {
                value: wrap(*value),
                checked,
            });
        }
    }
    Ok(())
}
