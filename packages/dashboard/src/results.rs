//! Results view: map frame and ranking fetch lifecycle.
//!
//! The view never edits settings. It derives everything from the read-only
//! [`SettingsSnapshot`] handed down by the coordinator:
//!
//! - the map URL and [`RefreshKey`], presented to a [`MapFrameSlot`];
//! - a [`RankingQuery`], fetched whenever the settings signature changes.
//!
//! Fetches are split into [`ResultsView::begin_fetch`], which hands out a
//! [`FetchTicket`], and [`ResultsView::complete`], which applies the result.
//! Only the completion for the most recently issued ticket is applied.

use std::sync::Arc;

use crash_map_dashboard_models::{RankingQuery, RankingResponse, RankingRow};

use crate::SettingsSnapshot;
use crate::client::{RankingClient, RankingError};
use crate::map_frame::{FrameUpdate, MapFrame, MapFrameSlot, RefreshKey};
use crate::query::ApiBase;
use crate::signature::QuerySignature;
use crate::table::RankingTable;

/// Message shown when the service cannot be reached or replies with an
/// unrecognized body.
#[must_use]
pub fn unreachable_message(api: &ApiBase) -> String {
    format!("Failed to connect to API. Make sure the crash data service is running at {api}")
}

/// Where the ranking fetch lifecycle currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    /// Nothing fetched yet.
    #[default]
    Idle,
    /// A fetch is outstanding.
    Loading,
    /// The latest fetch produced a ranking.
    Success,
    /// The latest fetch failed.
    Error,
}

/// A fetch started by [`ResultsView::begin_fetch`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    /// Sequence number to pass back to [`ResultsView::complete`].
    pub seq: u64,
    /// Query to send.
    pub query: RankingQuery,
}

/// Outcome of [`ResultsView::complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The result belonged to the latest fetch and was applied.
    Applied,
    /// A newer fetch was issued since; the result was dropped.
    Stale,
}

/// What the rankings panel shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RankingDisplay<'a> {
    /// A fetch is outstanding.
    Loading,
    /// The latest fetch failed with this message.
    Error(&'a str),
    /// The current ranking.
    Table(RankingTable),
}

/// Placeholder shown while a fetch is outstanding.
pub const LOADING_PLACEHOLDER: &str = "Loading data...";

/// Map and rankings derived from the current settings.
#[derive(Debug)]
pub struct ResultsView {
    api: ApiBase,
    title: String,
    inputs: Arc<SettingsSnapshot>,
    map: MapFrameSlot,
    last_frame_update: FrameUpdate,
    ranking: Vec<RankingRow>,
    total_crashes: u64,
    notice: Option<String>,
    phase: FetchPhase,
    error: Option<String>,
    panel_open: bool,
    last_signature: Option<QuerySignature>,
    issued: u64,
}

impl ResultsView {
    /// Creates the view for `inputs` and presents the initial map frame.
    ///
    /// No fetch is started; call [`Self::mount`] for that.
    #[must_use]
    pub fn new(api: ApiBase, title: impl Into<String>, inputs: Arc<SettingsSnapshot>) -> Self {
        let mut map = MapFrameSlot::new();
        let last_frame_update = map.present(
            RefreshKey::of(&inputs.filters),
            api.map_url(&inputs.filters),
        );
        Self {
            api,
            title: title.into(),
            inputs,
            map,
            last_frame_update,
            ranking: Vec::new(),
            total_crashes: 0,
            notice: None,
            phase: FetchPhase::Idle,
            error: None,
            panel_open: false,
            last_signature: None,
            issued: 0,
        }
    }

    /// Starts the initial fetch for the current inputs.
    pub fn mount(&mut self) -> FetchTicket {
        self.last_signature = Some(QuerySignature::of(&self.inputs));
        self.begin_fetch()
    }

    /// Receives new settings from the coordinator.
    ///
    /// The map frame follows the filters. A fetch is started only when the
    /// settings signature differs from the one that triggered the previous
    /// fetch.
    pub fn set_inputs(&mut self, inputs: Arc<SettingsSnapshot>) -> Option<FetchTicket> {
        self.inputs = inputs;
        self.last_frame_update = self.map.present(
            RefreshKey::of(&self.inputs.filters),
            self.api.map_url(&self.inputs.filters),
        );

        let signature = QuerySignature::of(&self.inputs);
        if self.last_signature.as_ref() == Some(&signature) {
            log::debug!("Settings signature {signature} unchanged, not refetching");
            return None;
        }
        log::debug!("Settings signature changed to {signature}");
        self.last_signature = Some(signature);
        Some(self.begin_fetch())
    }

    /// Starts a fresh fetch for the current inputs, whatever the signature.
    pub fn retry(&mut self) -> FetchTicket {
        log::debug!("Retrying ranking fetch");
        self.last_signature = Some(QuerySignature::of(&self.inputs));
        self.begin_fetch()
    }

    /// Enters the loading state and issues a new sequence number.
    ///
    /// The previous ranking stays visible to callers until a result lands.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.phase = FetchPhase::Loading;
        self.error = None;

        let query = RankingQuery::new(
            self.inputs.rank_type,
            self.inputs.group_by,
            self.inputs.filters.clone(),
        );
        log::info!(
            "Fetching ranking #{} (rank_type={}, group_by={})",
            self.issued,
            query.rank_type,
            query.group_by,
        );
        FetchTicket {
            seq: self.issued,
            query,
        }
    }

    /// Applies the result of the fetch numbered `seq`.
    ///
    /// Results for anything but the most recently issued fetch are dropped
    /// without touching any state.
    pub fn complete(
        &mut self,
        seq: u64,
        result: Result<RankingResponse, RankingError>,
    ) -> Completion {
        if seq != self.issued {
            log::warn!(
                "Discarding stale ranking result #{seq} (latest is #{})",
                self.issued
            );
            return Completion::Stale;
        }

        match result {
            Ok(RankingResponse::Success(payload)) => {
                log::info!(
                    "Ranking #{seq} loaded: {} rows, {} crashes",
                    payload.ranking.len(),
                    payload.total_crashes
                );
                self.ranking = payload.ranking;
                self.total_crashes = payload.total_crashes;
                self.notice = payload.message;
                self.error = None;
                self.phase = FetchPhase::Success;
            }
            Ok(RankingResponse::Failure { error }) => {
                log::info!("Ranking #{seq} rejected by service: {error}");
                self.error = Some(error);
                self.phase = FetchPhase::Error;
            }
            Err(e) => {
                log::warn!("Ranking #{seq} failed: {e}");
                self.error = Some(unreachable_message(&self.api));
                self.phase = FetchPhase::Error;
            }
        }
        Completion::Applied
    }

    /// Runs the pending fetch for `ticket` against `client` inline and
    /// applies its result.
    pub async fn run(&mut self, client: &dyn RankingClient, ticket: FetchTicket) -> Completion {
        let result = client.fetch_ranking(&ticket.query).await;
        self.complete(ticket.seq, result)
    }

    /// Whether a fetch is outstanding.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.phase == FetchPhase::Loading
    }

    /// Lifecycle phase.
    #[must_use]
    pub const fn phase(&self) -> FetchPhase {
        self.phase
    }

    /// Message of the latest failed fetch.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Last successfully loaded ranking.
    #[must_use]
    pub fn ranking(&self) -> &[RankingRow] {
        &self.ranking
    }

    /// Crash total of the last successful fetch.
    #[must_use]
    pub const fn total_crashes(&self) -> u64 {
        self.total_crashes
    }

    /// Informational note from the last successful fetch.
    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    /// Settings the view currently reflects.
    #[must_use]
    pub fn inputs(&self) -> &SettingsSnapshot {
        &self.inputs
    }

    /// Dashboard heading.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The current map frame.
    #[must_use]
    pub const fn map_frame(&self) -> Option<&MapFrame> {
        self.map.frame()
    }

    /// What the last settings change did to the map frame.
    #[must_use]
    pub const fn last_frame_update(&self) -> FrameUpdate {
        self.last_frame_update
    }

    /// Whether the rankings panel is expanded.
    #[must_use]
    pub const fn panel_open(&self) -> bool {
        self.panel_open
    }

    /// Expands or collapses the rankings panel.
    pub const fn toggle_panel(&mut self) {
        self.panel_open = !self.panel_open;
    }

    /// Label of the panel toggle.
    #[must_use]
    pub const fn panel_label(&self) -> &'static str {
        if self.panel_open {
            "Hide Rankings"
        } else {
            "Show Rankings"
        }
    }

    /// Rankings panel content. Loading takes precedence over an error,
    /// which takes precedence over the table.
    #[must_use]
    pub fn display(&self) -> RankingDisplay<'_> {
        if self.loading() {
            return RankingDisplay::Loading;
        }
        if let Some(error) = &self.error {
            return RankingDisplay::Error(error);
        }
        RankingDisplay::Table(RankingTable::build(
            self.inputs.rank_type,
            self.inputs.group_by,
            &self.ranking,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{GatedClient, StubClient, api, main_st_response, transport_error};
    use crate::FilterValue;
    use crash_map_crash_models::{DamageLevel, RankType};
    use serde_json::json;

    fn view() -> ResultsView {
        ResultsView::new(api(), "High Risk Intersections", Arc::default())
    }

    fn with_damage(damage: DamageLevel) -> Arc<SettingsSnapshot> {
        let mut snapshot = SettingsSnapshot::default();
        snapshot.filters.set(FilterValue::Damage(damage), true);
        Arc::new(snapshot)
    }

    #[tokio::test]
    async fn successful_fetch_fills_the_table() {
        let client = StubClient::replying(main_st_response());
        let mut view = view();
        assert_eq!(view.phase(), FetchPhase::Idle);

        let ticket = view.mount();
        assert!(view.loading());
        assert_eq!(view.display(), RankingDisplay::Loading);
        assert_eq!(view.run(&client, ticket).await, Completion::Applied);

        assert!(!view.loading());
        assert_eq!(view.phase(), FetchPhase::Success);
        assert_eq!(view.error(), None);
        assert_eq!(view.total_crashes(), 1000);
        let RankingDisplay::Table(table) = view.display() else {
            panic!("expected table, got {:?}", view.display());
        };
        assert_eq!(table.rows[0], vec!["1", "Main St", "42", "3.50"]);

        let sent = client.queries();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].rank_type, RankType::Frequency);
        assert_eq!(sent[0].limit, 10);
    }

    #[tokio::test]
    async fn service_error_is_shown_verbatim_and_keeps_ranking() {
        let mut view = view();
        let ticket = view.mount();
        view.run(&StubClient::replying(main_st_response()), ticket)
            .await;

        let failing = StubClient::replying(json!({ "error": "date range invalid" }));
        let ticket = view
            .set_inputs(with_damage(DamageLevel::UpTo500))
            .unwrap();
        view.run(&failing, ticket).await;

        assert!(!view.loading());
        assert_eq!(view.error(), Some("date range invalid"));
        assert_eq!(view.display(), RankingDisplay::Error("date range invalid"));
        assert_eq!(view.ranking()[0].name.as_deref(), Some("Main St"));
        assert_eq!(view.total_crashes(), 1000);
    }

    #[tokio::test]
    async fn transport_failure_shows_connectivity_message() {
        let mut view = view();
        let ticket = view.mount();
        view.run(&StubClient::unreachable(), ticket).await;

        assert!(!view.loading());
        assert_eq!(view.phase(), FetchPhase::Error);
        let error = view.error().unwrap();
        assert!(error.starts_with("Failed to connect to API"), "{error}");
        assert!(error.contains("http://127.0.0.1:8000"), "{error}");
    }

    #[test]
    fn new_fetch_clears_error_but_keeps_previous_rows() {
        let mut view = view();
        let first = view.mount();
        view.complete(
            first.seq,
            Ok(serde_json::from_value(main_st_response()).unwrap()),
        );
        let second = view.retry();
        view.complete(second.seq, Err(transport_error()));
        assert!(view.error().is_some());

        view.retry();
        assert!(view.loading());
        assert_eq!(view.error(), None);
        assert_eq!(view.ranking().len(), 1);
    }

    #[test]
    fn notice_is_recorded() {
        let mut view = view();
        let ticket = view.mount();
        let body = json!({
            "ranking": [],
            "total_crashes": 0,
            "message": "No crashes found matching the selected filters"
        });
        view.complete(ticket.seq, Ok(serde_json::from_value(body).unwrap()));
        assert_eq!(
            view.notice(),
            Some("No crashes found matching the selected filters")
        );
        assert!(view.ranking().is_empty());
    }

    #[tokio::test]
    async fn latest_fetch_wins_when_results_arrive_out_of_order() {
        let client = GatedClient::new();
        let mut view = view();

        let a = view.set_inputs(with_damage(DamageLevel::UpTo500)).unwrap();
        let b = view
            .set_inputs(with_damage(DamageLevel::Over1500))
            .unwrap();
        let release_a = client.gate(&a.query);
        let release_b = client.gate(&b.query);

        let fetch_a = {
            let query = a.query.clone();
            let client = client.clone();
            tokio::spawn(async move { client.fetch_ranking(&query).await })
        };
        let fetch_b = {
            let query = b.query.clone();
            let client = client.clone();
            tokio::spawn(async move { client.fetch_ranking(&query).await })
        };

        let named = |name: &str| {
            serde_json::from_value::<RankingResponse>(json!({
                "ranking": [{ "name": name, "COUNT": 1 }],
                "total_crashes": 1
            }))
            .unwrap()
        };
        release_b.send(named("B")).unwrap();
        let result_b = fetch_b.await.unwrap();
        assert_eq!(view.complete(b.seq, result_b), Completion::Applied);

        release_a.send(named("A")).unwrap();
        let result_a = fetch_a.await.unwrap();
        // Applying completions in arrival order with no sequence check
        // would let A overwrite B here.
        assert_eq!(view.complete(a.seq, result_a), Completion::Stale);

        assert_eq!(view.ranking()[0].name.as_deref(), Some("B"));
        assert!(!view.loading());
    }

    #[test]
    fn stale_completion_leaves_loading_untouched() {
        let mut view = view();
        let a = view.mount();
        let _b = view.retry();
        assert_eq!(
            view.complete(a.seq, Err(transport_error())),
            Completion::Stale
        );
        assert!(view.loading());
        assert_eq!(view.error(), None);
    }

    #[test]
    fn unchanged_signature_does_not_refetch() {
        let mut view = view();
        view.mount();
        assert!(view.set_inputs(Arc::default()).is_none());

        let changed = with_damage(DamageLevel::From501To1500);
        assert!(view.set_inputs(Arc::clone(&changed)).is_some());
        assert!(view.set_inputs(changed).is_none());
    }

    #[test]
    fn map_frame_follows_filters_only() {
        let mut view = view();
        assert_eq!(view.last_frame_update(), FrameUpdate::Created);

        let ranked = SettingsSnapshot {
            rank_type: RankType::Dangerous,
            ..SettingsSnapshot::default()
        };
        assert!(view.set_inputs(Arc::new(ranked)).is_some());
        assert_eq!(view.last_frame_update(), FrameUpdate::Unchanged);

        view.set_inputs(with_damage(DamageLevel::UpTo500));
        assert_eq!(
            view.last_frame_update(),
            FrameUpdate::Recreated { discarded: 1 }
        );
        let src = &view.map_frame().unwrap().src;
        assert!(src.as_str().contains("damage=%24500+OR+LESS"), "{src}");
    }

    #[test]
    fn panel_toggle_flips_label() {
        let mut view = view();
        assert!(!view.panel_open());
        assert_eq!(view.panel_label(), "Show Rankings");
        view.toggle_panel();
        assert!(view.panel_open());
        assert_eq!(view.panel_label(), "Hide Rankings");
        view.toggle_panel();
        assert!(!view.panel_open());
    }
}
