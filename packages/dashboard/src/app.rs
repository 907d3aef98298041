//! Dashboard event loop.
//!
//! [`Dashboard`] owns the settings panel, the coordinator and the results
//! view, and is the only thing that mutates them. Ranking fetches run as
//! spawned tasks holding just their query and a client handle. They are
//! tracked in a [`JoinSet`] and their results are applied by
//! [`Dashboard::next_completion`] on the owning task.
//!
//! Starting a fetch aborts the one it replaces, so settling only ever waits
//! for the latest request.

use std::sync::Arc;

use crash_map_dashboard_models::RankingResponse;
use tokio::task::{self, JoinSet};

use crate::SettingsSnapshot;
use crate::client::{RankingClient, RankingError};
use crate::coordinator::RootCoordinator;
use crate::panel::{SettingsEdit, SettingsPanel};
use crate::query::ApiBase;
use crate::results::{Completion, FetchTicket, ResultsView};

/// Result of a spawned ranking fetch.
#[derive(Debug)]
pub struct FetchCompletion {
    /// Sequence number of the ticket the fetch was started for.
    pub seq: u64,
    /// What the client returned.
    pub result: Result<RankingResponse, RankingError>,
}

/// The whole dashboard: settings panel, coordinator and results view.
pub struct Dashboard {
    panel: SettingsPanel,
    coordinator: RootCoordinator,
    results: ResultsView,
    client: Arc<dyn RankingClient>,
    tasks: JoinSet<FetchCompletion>,
    latest: Option<(task::Id, u64)>,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("panel", &self.panel)
            .field("coordinator", &self.coordinator)
            .field("results", &self.results)
            .field("in_flight", &self.tasks.len())
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    /// Creates a dashboard with default settings talking to `client`.
    ///
    /// Nothing is fetched until [`Self::mount`].
    #[must_use]
    pub fn new(api: ApiBase, title: impl Into<String>, client: Arc<dyn RankingClient>) -> Self {
        let panel = SettingsPanel::new();
        let coordinator = RootCoordinator::new();
        let results = ResultsView::new(api, title, coordinator.settings());
        Self {
            panel,
            coordinator,
            results,
            client,
            tasks: JoinSet::new(),
            latest: None,
        }
    }

    /// Starts the initial ranking fetch.
    pub fn mount(&mut self) {
        let ticket = self.results.mount();
        self.spawn_fetch(ticket);
    }

    /// Applies a settings edit and propagates the new snapshot.
    ///
    /// Returns `true` if a ranking fetch was started.
    pub fn edit(&mut self, edit: SettingsEdit) -> bool {
        let snapshot = self.panel.apply(edit);
        let view = self.coordinator.update_settings(snapshot);
        match self.results.set_inputs(view) {
            Some(ticket) => {
                self.spawn_fetch(ticket);
                true
            }
            None => false,
        }
    }

    /// Refetches the ranking for the current settings.
    pub fn retry(&mut self) {
        let ticket = self.results.retry();
        self.spawn_fetch(ticket);
    }

    /// Expands or collapses the rankings panel.
    pub const fn toggle_panel(&mut self) {
        self.results.toggle_panel();
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket) {
        // Anything still running belongs to an older ticket.
        self.tasks.abort_all();

        let client = Arc::clone(&self.client);
        let FetchTicket { seq, query } = ticket;
        let handle = self.tasks.spawn(async move {
            let result = client.fetch_ranking(&query).await;
            FetchCompletion { seq, result }
        });
        self.latest = Some((handle.id(), seq));
    }

    /// Waits for the next spawned fetch to finish and applies it.
    ///
    /// Aborted fetches are skipped. A fetch task that panicked is applied
    /// as a [`RankingError::Task`] failure if it was the latest one.
    ///
    /// Returns `None` once no fetch is left to join.
    pub async fn next_completion(&mut self) -> Option<Completion> {
        loop {
            match self.tasks.join_next().await? {
                Ok(FetchCompletion { seq, result }) => {
                    return Some(self.results.complete(seq, result));
                }
                Err(e) if e.is_cancelled() => {
                    log::debug!("Superseded ranking fetch was cancelled");
                }
                Err(e) => {
                    log::error!("Ranking fetch task failed: {e}");
                    let id = e.id();
                    if let Some((_, seq)) = self.latest.filter(|(latest, _)| *latest == id) {
                        return Some(self.results.complete(seq, Err(RankingError::Task(e))));
                    }
                }
            }
        }
    }

    /// Applies completions until every spawned fetch has been joined.
    pub async fn settle(&mut self) {
        while self.next_completion().await.is_some() {}
    }

    /// Number of spawned fetches that have not been joined yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// The editable settings.
    #[must_use]
    pub const fn panel(&self) -> &SettingsPanel {
        &self.panel
    }

    /// The settings the coordinator currently holds.
    #[must_use]
    pub fn settings(&self) -> Arc<SettingsSnapshot> {
        self.coordinator.settings()
    }

    /// The results view rendering the current settings.
    #[must_use]
    pub const fn results(&self) -> &ResultsView {
        &self.results
    }
}
