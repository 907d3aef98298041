#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Crash filter taxonomy and ranking mode types.
//!
//! Defines the fixed enumerated domains the dashboard filters on (damage,
//! crash type, injury severity, contributory cause, lighting) along with
//! the ranking and grouping modes understood by the crash data service.
//! Every variant serializes to the exact literal the service expects on
//! the wire.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString, IntoStaticStr};

/// A fixed enumerated filter domain.
///
/// Implemented by every checkbox group in the settings panel. The set of
/// values is closed, so an invalid filter value cannot be represented.
pub trait FilterDomain:
    Copy + Ord + std::fmt::Debug + Into<&'static str> + FromStr + Send + Sync + 'static
{
    /// Query parameter this domain is sent as (e.g. `"crash_type"`).
    const PARAM: &'static str;

    /// Heading shown above the checkbox group.
    const TITLE: &'static str;

    /// Returns all variants in declaration order.
    fn all() -> &'static [Self];

    /// Returns the human-readable checkbox label.
    fn label(self) -> &'static str;

    /// Returns the literal wire value, the variant's `strum` serialization.
    fn wire_value(self) -> &'static str {
        self.into()
    }
}

/// Reported property damage bracket.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
pub enum DamageLevel {
    /// $500 or less
    #[serde(rename = "$500 OR LESS")]
    #[strum(serialize = "$500 OR LESS")]
    UpTo500,
    /// $501 to $1,500
    #[serde(rename = "$501 - $1,500")]
    #[strum(serialize = "$501 - $1,500")]
    From501To1500,
    /// More than $1,500
    #[serde(rename = "OVER $1,500")]
    #[strum(serialize = "OVER $1,500")]
    Over1500,
}

impl FilterDomain for DamageLevel {
    const PARAM: &'static str = "damage";
    const TITLE: &'static str = "Damage";

    fn all() -> &'static [Self] {
        &[Self::UpTo500, Self::From501To1500, Self::Over1500]
    }

    fn label(self) -> &'static str {
        match self {
            Self::UpTo500 => "$500 or Less",
            Self::From501To1500 => "$501 - $1,500",
            Self::Over1500 => "Over $1,500",
        }
    }
}

/// Crash outcome classification as recorded by the reporting officer.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
pub enum CrashType {
    /// No injuries, vehicles driven away
    #[serde(rename = "NO INJURY / DRIVE AWAY")]
    #[strum(serialize = "NO INJURY / DRIVE AWAY")]
    NoInjuryDriveAway,
    /// Injury and/or tow due to crash
    #[serde(rename = "INJURY AND / OR TOW DUE TO CRASH")]
    #[strum(serialize = "INJURY AND / OR TOW DUE TO CRASH")]
    InjuryOrTow,
}

impl FilterDomain for CrashType {
    const PARAM: &'static str = "crash_type";
    const TITLE: &'static str = "Crash Type";

    fn all() -> &'static [Self] {
        &[Self::NoInjuryDriveAway, Self::InjuryOrTow]
    }

    fn label(self) -> &'static str {
        match self {
            Self::NoInjuryDriveAway => "No Injury / Drive Away",
            Self::InjuryOrTow => "Injury / Tow",
        }
    }
}

/// Most severe injury class present in a crash.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InjurySeverity {
    /// Injury score of zero
    None,
    /// At least one non-incapacitating injury
    NonIncapacitating,
    /// At least one incapacitating injury
    Incapacitating,
    /// At least one fatality
    Fatal,
}

impl FilterDomain for InjurySeverity {
    const PARAM: &'static str = "injuries";
    const TITLE: &'static str = "Injuries";

    fn all() -> &'static [Self] {
        &[
            Self::None,
            Self::NonIncapacitating,
            Self::Incapacitating,
            Self::Fatal,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Self::None => "No Injury",
            Self::NonIncapacitating => "Non-Incapacitating",
            Self::Incapacitating => "Incapacitating",
            Self::Fatal => "Fatal",
        }
    }
}

/// Grouping of primary contributory causes.
///
/// The service expands each group into the underlying cause codes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CauseCategory {
    /// Driver behavior (speeding, failing to yield, distraction, ...)
    User,
    /// Environment (weather, animals, road defects, ...)
    NonUser,
    /// Vehicle equipment condition
    Vehicle,
}

impl FilterDomain for CauseCategory {
    const PARAM: &'static str = "cause";
    const TITLE: &'static str = "Cause";

    fn all() -> &'static [Self] {
        &[Self::User, Self::NonUser, Self::Vehicle]
    }

    fn label(self) -> &'static str {
        match self {
            Self::User => "User Error",
            Self::NonUser => "Non-User Error",
            Self::Vehicle => "Vehicle Error",
        }
    }
}

/// Lighting condition at the time of the crash.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    IntoStaticStr,
)]
pub enum LightingCondition {
    /// Daylight
    #[serde(rename = "DAYLIGHT")]
    #[strum(serialize = "DAYLIGHT")]
    Daylight,
    /// Dark with street lighting
    #[serde(rename = "DARKNESS, LIGHTED ROAD")]
    #[strum(serialize = "DARKNESS, LIGHTED ROAD")]
    DarknessLightedRoad,
    /// Dark without street lighting
    #[serde(rename = "DARKNESS")]
    #[strum(serialize = "DARKNESS")]
    Darkness,
    /// Dawn
    #[serde(rename = "DAWN")]
    #[strum(serialize = "DAWN")]
    Dawn,
    /// Dusk
    #[serde(rename = "DUSK")]
    #[strum(serialize = "DUSK")]
    Dusk,
}

impl FilterDomain for LightingCondition {
    const PARAM: &'static str = "lighting";
    const TITLE: &'static str = "Lighting";

    fn all() -> &'static [Self] {
        &[
            Self::Daylight,
            Self::DarknessLightedRoad,
            Self::Darkness,
            Self::Dawn,
            Self::Dusk,
        ]
    }

    fn label(self) -> &'static str {
        match self {
            Self::Daylight => "Daylight",
            Self::DarknessLightedRoad => "Dark (Lighted)",
            Self::Darkness => "Dark (Unlighted)",
            Self::Dawn => "Dawn",
            Self::Dusk => "Dusk",
        }
    }
}

/// How hot spots are ordered by the ranking endpoint.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum RankType {
    /// Total crash count
    #[default]
    Frequency,
    /// Sum of injury severity scores
    Weighted,
    /// Average injury score per crash
    Dangerous,
}

impl RankType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Frequency, Self::Weighted, Self::Dangerous]
    }

    /// Returns the option label shown in the rank selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Frequency => "Most Frequent",
            Self::Weighted => "Weighted by Injury",
            Self::Dangerous => "Most Dangerous",
        }
    }

    /// Returns the one-line explanation of the ranking criterion.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Frequency => "Total crash count",
            Self::Weighted => "By injury severity score",
            Self::Dangerous => "Average injury per crash",
        }
    }

    /// Whether ranking rows carry injury breakdown columns.
    #[must_use]
    pub const fn has_injury_columns(self) -> bool {
        !matches!(self, Self::Frequency)
    }

    /// Whether ranking rows carry the average injury score column.
    #[must_use]
    pub const fn has_average_score(self) -> bool {
        matches!(self, Self::Dangerous)
    }
}

/// How crashes are bucketed into hot spots.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum GroupBy {
    /// By street name
    #[default]
    Street,
    /// By latitude/longitude bin
    Location,
}

impl GroupBy {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Street, Self::Location]
    }

    /// Returns the option label shown in the group-by selector.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Street => "Street",
            Self::Location => "Location",
        }
    }

    /// Returns the heading of the name column in the ranking table.
    #[must_use]
    pub const fn name_header(self) -> &'static str {
        match self {
            Self::Street => "Street Name",
            Self::Location => "Location",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_domain_consistent<T: FilterDomain + std::fmt::Display + Serialize>()
    where
        <T as FromStr>::Err: std::fmt::Debug,
    {
        for value in T::all() {
            assert_eq!(value.to_string(), value.wire_value(), "{value:?}");
            assert_eq!(
                serde_json::to_value(value).unwrap(),
                serde_json::Value::from(value.wire_value()),
                "{value:?}"
            );
            let parsed: T = value.wire_value().parse().unwrap();
            assert_eq!(parsed, *value);
            assert!(!value.label().is_empty(), "{value:?} has empty label");
        }
        for window in T::all().windows(2) {
            assert!(window[0] < window[1], "{} not in declaration order", T::TITLE);
        }
    }

    #[test]
    fn filter_domains_are_consistent() {
        assert_domain_consistent::<DamageLevel>();
        assert_domain_consistent::<CrashType>();
        assert_domain_consistent::<InjurySeverity>();
        assert_domain_consistent::<CauseCategory>();
        assert_domain_consistent::<LightingCondition>();
    }

    #[test]
    fn serde_uses_wire_literals() {
        assert_eq!(
            serde_json::to_string(&DamageLevel::From501To1500).unwrap(),
            r#""$501 - $1,500""#
        );
        assert_eq!(
            serde_json::to_string(&LightingCondition::DarknessLightedRoad).unwrap(),
            r#""DARKNESS, LIGHTED ROAD""#
        );
        assert_eq!(
            serde_json::to_string(&InjurySeverity::NonIncapacitating).unwrap(),
            r#""non_incapacitating""#
        );
        assert_eq!(
            serde_json::to_string(&RankType::Dangerous).unwrap(),
            r#""dangerous""#
        );
    }

    #[test]
    fn rejects_values_outside_domain() {
        assert!("OVER $2,000".parse::<DamageLevel>().is_err());
        assert!("darkness".parse::<LightingCondition>().is_err());
        assert!("popular".parse::<RankType>().is_err());
    }

    #[test]
    fn rank_type_column_visibility() {
        assert!(!RankType::Frequency.has_injury_columns());
        assert!(RankType::Weighted.has_injury_columns());
        assert!(!RankType::Weighted.has_average_score());
        assert!(RankType::Dangerous.has_average_score());
    }

    #[test]
    fn defaults_match_initial_panel_state() {
        assert_eq!(RankType::default(), RankType::Frequency);
        assert_eq!(GroupBy::default(), GroupBy::Street);
        assert_eq!(GroupBy::Location.to_string(), "location");
    }
}
