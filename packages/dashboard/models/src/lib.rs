#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter state, settings snapshot and ranking API types for the crash map
//! dashboard.
//!
//! [`FilterSet`] is the structured filter state edited by the settings
//! panel. [`SettingsSnapshot`] is the immutable bundle handed from the panel
//! to the coordinator on every edit. [`build_filter_params`] is the single
//! place where filter state becomes query parameters, shared by the map URL
//! and the ranking request.

pub mod ranking;

use std::collections::BTreeSet;

use chrono::NaiveDate;
use crash_map_crash_models::{
    CauseCategory, CrashType, DamageLevel, FilterDomain, GroupBy, InjurySeverity,
    LightingCondition, RankType,
};
use serde::{Deserialize, Serialize};

pub use ranking::{
    HealthResponse, RANKING_LIMIT, RankingPayload, RankingQuery, RankingResponse, RankingRow,
};

/// First day of the dataset, used as the initial start date.
pub const DEFAULT_DATE_START: NaiveDate = match NaiveDate::from_ymd_opt(2017, 10, 24) {
    Some(date) => date,
    None => panic!("invalid default start date"),
};

/// Last day of the dataset, used as the initial end date.
pub const DEFAULT_DATE_END: NaiveDate = match NaiveDate::from_ymd_opt(2025, 10, 24) {
    Some(date) => date,
    None => panic!("invalid default end date"),
};

/// Format of date inputs and of the `date_start`/`date_end` parameters.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Structured filter state.
///
/// Each checkbox group is a set over its fixed domain, so a value is either
/// selected or not and duplicates cannot exist. Sets iterate in domain
/// declaration order, which makes the serialized form independent of the
/// order in which values were toggled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterSet {
    /// Inclusive start of the crash date range. `None` when cleared.
    pub date_start: Option<NaiveDate>,
    /// Inclusive end of the crash date range. `None` when cleared.
    pub date_end: Option<NaiveDate>,
    /// Selected damage brackets.
    pub damage: BTreeSet<DamageLevel>,
    /// Selected crash types.
    pub crash_type: BTreeSet<CrashType>,
    /// Selected injury severities.
    pub injuries: BTreeSet<InjurySeverity>,
    /// Selected cause categories.
    pub cause: BTreeSet<CauseCategory>,
    /// Selected lighting conditions.
    pub lighting: BTreeSet<LightingCondition>,
}

impl Default for FilterSet {
    fn default() -> Self {
        Self {
            date_start: Some(DEFAULT_DATE_START),
            date_end: Some(DEFAULT_DATE_END),
            damage: BTreeSet::new(),
            crash_type: BTreeSet::new(),
            injuries: BTreeSet::new(),
            cause: BTreeSet::new(),
            lighting: BTreeSet::new(),
        }
    }
}

impl FilterSet {
    /// Whether `value` is currently selected.
    #[must_use]
    pub fn contains(&self, value: FilterValue) -> bool {
        match value {
            FilterValue::Damage(v) => self.damage.contains(&v),
            FilterValue::CrashType(v) => self.crash_type.contains(&v),
            FilterValue::Injury(v) => self.injuries.contains(&v),
            FilterValue::Cause(v) => self.cause.contains(&v),
            FilterValue::Lighting(v) => self.lighting.contains(&v),
        }
    }

    /// Selects or deselects `value`. Returns whether the set changed.
    pub fn set(&mut self, value: FilterValue, checked: bool) -> bool {
        fn apply<T: Ord>(set: &mut BTreeSet<T>, value: T, checked: bool) -> bool {
            if checked {
                set.insert(value)
            } else {
                set.remove(&value)
            }
        }

        match value {
            FilterValue::Damage(v) => apply(&mut self.damage, v, checked),
            FilterValue::CrashType(v) => apply(&mut self.crash_type, v, checked),
            FilterValue::Injury(v) => apply(&mut self.injuries, v, checked),
            FilterValue::Cause(v) => apply(&mut self.cause, v, checked),
            FilterValue::Lighting(v) => apply(&mut self.lighting, v, checked),
        }
    }

    /// Flips the selection of `value`.
    pub fn toggle(&mut self, value: FilterValue) {
        let checked = !self.contains(value);
        self.set(value, checked);
    }

    /// All currently selected values across every checkbox group.
    #[must_use]
    pub fn selected(&self) -> Vec<FilterValue> {
        self.damage
            .iter()
            .copied()
            .map(FilterValue::Damage)
            .chain(self.crash_type.iter().copied().map(FilterValue::CrashType))
            .chain(self.injuries.iter().copied().map(FilterValue::Injury))
            .chain(self.cause.iter().copied().map(FilterValue::Cause))
            .chain(self.lighting.iter().copied().map(FilterValue::Lighting))
            .collect()
    }
}

/// Builds the optional filter query parameters for `filters`.
///
/// A parameter is omitted entirely when its field is empty: the service
/// treats an absent parameter as "match all" but an empty one as "match
/// nothing". Multi-valued fields are comma-joined in domain order.
#[must_use]
pub fn build_filter_params(filters: &FilterSet) -> Vec<(&'static str, String)> {
    fn push_set<T: FilterDomain>(params: &mut Vec<(&'static str, String)>, set: &BTreeSet<T>) {
        if set.is_empty() {
            return;
        }
        let joined = set
            .iter()
            .map(|v| v.wire_value())
            .collect::<Vec<_>>()
            .join(",");
        params.push((T::PARAM, joined));
    }

    let mut params = Vec::with_capacity(7);

    if let Some(start) = filters.date_start {
        params.push(("date_start", start.format(DATE_FORMAT).to_string()));
    }
    if let Some(end) = filters.date_end {
        params.push(("date_end", end.format(DATE_FORMAT).to_string()));
    }
    push_set(&mut params, &filters.damage);
    push_set(&mut params, &filters.crash_type);
    push_set(&mut params, &filters.injuries);
    push_set(&mut params, &filters.cause);
    push_set(&mut params, &filters.lighting);

    params
}

/// Parses the text of a date input.
///
/// Empty (or whitespace-only) input clears the date.
///
/// # Errors
///
/// Returns [`InvalidDateError`] if the input is not a `YYYY-MM-DD` date.
pub fn parse_date_input(input: &str) -> Result<Option<NaiveDate>, InvalidDateError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map(Some)
        .map_err(|_| InvalidDateError {
            input: trimmed.to_string(),
        })
}

/// A single checkbox value from any filter group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FilterValue {
    /// A damage bracket.
    Damage(DamageLevel),
    /// A crash type.
    CrashType(CrashType),
    /// An injury severity.
    Injury(InjurySeverity),
    /// A cause category.
    Cause(CauseCategory),
    /// A lighting condition.
    Lighting(LightingCondition),
}

impl FilterValue {
    /// Parses a literal wire value for the filter group sent as `param`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidFilterValueError`] if `param` is not a filter group
    /// or `value` is outside that group's domain.
    pub fn from_param(param: &str, value: &str) -> Result<Self, InvalidFilterValueError> {
        let parsed = if param == DamageLevel::PARAM {
            value.parse().ok().map(Self::Damage)
        } else if param == CrashType::PARAM {
            value.parse().ok().map(Self::CrashType)
        } else if param == InjurySeverity::PARAM {
            value.parse().ok().map(Self::Injury)
        } else if param == CauseCategory::PARAM {
            value.parse().ok().map(Self::Cause)
        } else if param == LightingCondition::PARAM {
            value.parse().ok().map(Self::Lighting)
        } else {
            None
        };
        parsed.ok_or_else(|| InvalidFilterValueError {
            param: param.to_string(),
            value: value.to_string(),
        })
    }

    /// Query parameter of the group this value belongs to.
    #[must_use]
    pub const fn param(self) -> &'static str {
        match self {
            Self::Damage(_) => DamageLevel::PARAM,
            Self::CrashType(_) => CrashType::PARAM,
            Self::Injury(_) => InjurySeverity::PARAM,
            Self::Cause(_) => CauseCategory::PARAM,
            Self::Lighting(_) => LightingCondition::PARAM,
        }
    }

    /// Literal wire value.
    #[must_use]
    pub fn wire_value(self) -> &'static str {
        match self {
            Self::Damage(v) => v.wire_value(),
            Self::CrashType(v) => v.wire_value(),
            Self::Injury(v) => v.wire_value(),
            Self::Cause(v) => v.wire_value(),
            Self::Lighting(v) => v.wire_value(),
        }
    }

    /// Human-readable checkbox label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Damage(v) => v.label(),
            Self::CrashType(v) => v.label(),
            Self::Injury(v) => v.label(),
            Self::Cause(v) => v.label(),
            Self::Lighting(v) => v.label(),
        }
    }
}

/// Error returned when a filter value is outside its enumerated domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidFilterValueError {
    /// The filter group parameter that was targeted.
    pub param: String,
    /// The rejected value.
    pub value: String,
}

impl std::fmt::Display for InvalidFilterValueError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid value {:?} for filter {}", self.value, self.param)
    }
}

impl std::error::Error for InvalidFilterValueError {}

/// Error returned when date input text is not a `YYYY-MM-DD` date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidDateError {
    /// The rejected input.
    pub input: String,
}

impl std::fmt::Display for InvalidDateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid date {:?}: expected YYYY-MM-DD", self.input)
    }
}

impl std::error::Error for InvalidDateError {}

/// Complete settings state emitted by the settings panel.
///
/// Always an owned copy: nothing in a snapshot refers back into the panel's
/// live state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsSnapshot {
    /// Ranking criterion.
    pub rank_type: RankType,
    /// Hot spot bucketing.
    pub group_by: GroupBy,
    /// Filter state.
    pub filters: FilterSet,
}
