//! Settings panel state.
//!
//! The panel owns the live, editable copy of the ranking and filter
//! settings. Every applied [`SettingsEdit`] yields exactly one owned
//! [`SettingsSnapshot`], which is what the coordinator stores.

use chrono::NaiveDate;
use crash_map_crash_models::{GroupBy, RankType};

use crate::{FilterSet, FilterValue, SettingsSnapshot};

/// A single user interaction with the settings panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsEdit {
    /// Rank selector changed.
    RankType(RankType),
    /// Group-by selector changed.
    GroupBy(GroupBy),
    /// Start date input changed; `None` when cleared.
    DateStart(Option<NaiveDate>),
    /// End date input changed; `None` when cleared.
    DateEnd(Option<NaiveDate>),
    /// A checkbox was set to `checked`.
    Filter {
        /// The checkbox.
        value: FilterValue,
        /// Its new state.
        checked: bool,
    },
    /// "Reset Filters" was pressed.
    Reset,
}

/// Editable ranking and filter settings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsPanel {
    rank_type: RankType,
    group_by: GroupBy,
    filters: FilterSet,
}

impl SettingsPanel {
    /// Creates a panel with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies `edit` and emits the resulting snapshot.
    pub fn apply(&mut self, edit: SettingsEdit) -> SettingsSnapshot {
        match edit {
            SettingsEdit::RankType(rank_type) => self.rank_type = rank_type,
            SettingsEdit::GroupBy(group_by) => self.group_by = group_by,
            SettingsEdit::DateStart(date) => self.filters.date_start = date,
            SettingsEdit::DateEnd(date) => self.filters.date_end = date,
            SettingsEdit::Filter { value, checked } => {
                self.filters.set(value, checked);
            }
            SettingsEdit::Reset => return self.reset(),
        }
        log::debug!("Settings edited: {edit:?}");
        self.snapshot()
    }

    /// Restores every filter to its default and emits the resulting
    /// snapshot. Rank type and grouping are kept.
    pub fn reset(&mut self) -> SettingsSnapshot {
        self.filters = FilterSet::default();
        log::debug!("Filters reset to defaults");
        self.snapshot()
    }

    /// Builds an owned snapshot of the current settings.
    #[must_use]
    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            rank_type: self.rank_type,
            group_by: self.group_by,
            filters: self.filters.clone(),
        }
    }

    /// Selected ranking criterion.
    #[must_use]
    pub const fn rank_type(&self) -> RankType {
        self.rank_type
    }

    /// Selected grouping.
    #[must_use]
    pub const fn group_by(&self) -> GroupBy {
        self.group_by
    }

    /// Live filter state.
    #[must_use]
    pub const fn filters(&self) -> &FilterSet {
        &self.filters
    }
}
