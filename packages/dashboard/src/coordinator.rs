//! Root coordinator: the single source of truth for dashboard settings.

use std::sync::Arc;

use crate::SettingsSnapshot;

/// Holds the authoritative settings triple.
///
/// Updates replace the whole snapshot, so readers never see filters from
/// one edit combined with a rank type from another. Readers get an
/// immutable shared view and hold no reference into the coordinator.
#[derive(Debug, Clone, Default)]
pub struct RootCoordinator {
    current: Arc<SettingsSnapshot>,
}

impl RootCoordinator {
    /// Creates a coordinator holding the default settings, matching a
    /// freshly created settings panel.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the stored settings with `snapshot` and returns the new
    /// read-only view.
    pub fn update_settings(&mut self, snapshot: SettingsSnapshot) -> Arc<SettingsSnapshot> {
        self.current = Arc::new(snapshot);
        Arc::clone(&self.current)
    }

    /// Current read-only view of the settings.
    #[must_use]
    pub fn settings(&self) -> Arc<SettingsSnapshot> {
        Arc::clone(&self.current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::{SettingsEdit, SettingsPanel};
    use crash_map_crash_models::{GroupBy, RankType};

    #[test]
    fn starts_in_agreement_with_the_panel() {
        assert_eq!(
            *RootCoordinator::new().settings(),
            SettingsPanel::new().snapshot()
        );
    }

    #[test]
    fn update_replaces_the_whole_triple() {
        let mut coordinator = RootCoordinator::new();
        let before = coordinator.settings();

        let mut panel = SettingsPanel::new();
        panel.apply(SettingsEdit::RankType(RankType::Dangerous));
        panel.apply(SettingsEdit::DateStart(None));
        let snapshot = panel.apply(SettingsEdit::GroupBy(GroupBy::Location));

        let view = coordinator.update_settings(snapshot.clone());
        assert_eq!(*view, snapshot);
        assert_eq!(*coordinator.settings(), snapshot);
        // Views handed out earlier stay as they were.
        assert_eq!(*before, SettingsSnapshot::default());
    }
}
