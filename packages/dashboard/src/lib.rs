#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Filter-to-query state synchronization for the crash map dashboard.
//!
//! The dashboard is a small state graph with one writer per piece of state:
//!
//! - [`panel::SettingsPanel`] owns the live, editable filter state and emits
//!   an owned [`SettingsSnapshot`] on every edit.
//! - [`coordinator::RootCoordinator`] stores the latest snapshot and hands
//!   it down as a read-only `Arc`.
//! - [`results::ResultsView`] derives the map frame (URL + refresh key) and
//!   runs the ranking fetch lifecycle, discarding out-of-order completions
//!   by sequence number.
//! - [`app::Dashboard`] wires the three together and runs ranking fetches
//!   as `tokio` tasks whose completions are routed back over a channel.
//!
//! The crash data service itself is external and only reached through
//! [`client::RankingClient`] and the URLs built by [`query::ApiBase`].

pub mod app;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod map_frame;
pub mod panel;
pub mod query;
pub mod results;
pub mod signature;
pub mod table;

#[cfg(test)]
pub(crate) mod testing;

pub use crash_map_dashboard_models::{FilterSet, FilterValue, SettingsSnapshot};
use thiserror::Error;

/// Errors from setting up the dashboard.
///
/// Ranking fetch failures are not represented here: they are absorbed by
/// [`results::ResultsView`] and shown inline.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// The HTTP client could not be built.
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// A config file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A config file is not valid TOML for [`config::DashboardConfig`].
    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// The configured service base URL is unusable.
    #[error("Invalid base URL {url:?}: {message}")]
    InvalidBaseUrl {
        /// The rejected URL.
        url: String,
        /// Why it was rejected.
        message: String,
    },
}
