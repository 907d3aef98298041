//! Ranking endpoint request and response types.
//!
//! These mirror the JSON contract of the crash data service. Rows are
//! treated as opaque: every column is optional and only checked for
//! presence when rendered.

use crash_map_crash_models::{GroupBy, RankType};
use serde::{Deserialize, Serialize};

use crate::{FilterSet, build_filter_params};

/// Number of hot spots requested from the ranking endpoint.
pub const RANKING_LIMIT: u32 = 10;

/// A single ranked hot spot as returned by the service.
///
/// Injury columns are only present for the `weighted` and `dangerous`
/// rank types; `AVERAGE_INJURY_SCORE` only for `dangerous`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankingRow {
    /// Street name, or `"lat, lon"` for location bins.
    #[serde(default)]
    pub name: Option<String>,
    /// Number of crashes.
    #[serde(rename = "COUNT", default)]
    pub count: Option<f64>,
    /// Crashes per month over the selected date range.
    #[serde(rename = "CRASHES_PER_MONTH", default)]
    pub crashes_per_month: Option<f64>,
    /// Fatal injuries.
    #[serde(rename = "INJURIES_FATAL", default)]
    pub injuries_fatal: Option<f64>,
    /// Incapacitating injuries.
    #[serde(rename = "INJURIES_INCAPACITATING", default)]
    pub injuries_incapacitating: Option<f64>,
    /// Non-incapacitating injuries.
    #[serde(rename = "INJURIES_NON_INCAPACITATING", default)]
    pub injuries_non_incapacitating: Option<f64>,
    /// Summed injury severity score.
    #[serde(rename = "INJURY_SCORE", default)]
    pub injury_score: Option<f64>,
    /// Injury score divided by crash count.
    #[serde(rename = "AVERAGE_INJURY_SCORE", default)]
    pub average_injury_score: Option<f64>,
}

/// Successful ranking response body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingPayload {
    /// Hot spots in rank order; index 0 is rank #1.
    pub ranking: Vec<RankingRow>,
    /// Number of crashes matching the filters.
    pub total_crashes: u64,
    /// Echo of the requested rank type.
    #[serde(default)]
    pub rank_type: Option<String>,
    /// Echo of the requested grouping.
    #[serde(default)]
    pub group_by: Option<String>,
    /// Informational note, e.g. when no crash matches the filters.
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of a ranking response: a payload or a service-reported error.
///
/// The `error` shape is tried first, so a body carrying an `error` string is
/// always treated as a failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RankingResponse {
    /// The service rejected or failed the query.
    Failure {
        /// Message to show the user verbatim.
        error: String,
    },
    /// The ranking was computed.
    Success(RankingPayload),
}

/// Query sent to the ranking endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RankingQuery {
    /// Ranking criterion.
    pub rank_type: RankType,
    /// Hot spot bucketing.
    pub group_by: GroupBy,
    /// Number of hot spots to return.
    pub limit: u32,
    /// Filter state.
    pub filters: FilterSet,
}

impl RankingQuery {
    /// Creates a query with the standard [`RANKING_LIMIT`].
    #[must_use]
    pub fn new(rank_type: RankType, group_by: GroupBy, filters: FilterSet) -> Self {
        Self {
            rank_type,
            group_by,
            limit: RANKING_LIMIT,
            filters,
        }
    }

    /// Returns the query parameters: the required ranking parameters
    /// followed by the filter parameters from [`build_filter_params`].
    #[must_use]
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("rank_type", self.rank_type.to_string()),
            ("group_by", self.group_by.to_string()),
            ("limit", self.limit.to_string()),
        ];
        params.extend(build_filter_params(&self.filters));
        params
    }
}

/// Body of the service health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Free-form status line.
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterValue;
    use crash_map_crash_models::CauseCategory;

    #[test]
    fn parses_frequency_payload() {
        let body = serde_json::json!({
            "ranking": [{"name": "Main St", "COUNT": 42, "CRASHES_PER_MONTH": 3.5}],
            "rank_type": "frequency",
            "group_by": "street",
            "total_crashes": 1000
        });
        let RankingResponse::Success(payload) = serde_json::from_value(body).unwrap() else {
            panic!("expected success");
        };
        assert_eq!(payload.total_crashes, 1000);
        let row = &payload.ranking[0];
        assert_eq!(row.name.as_deref(), Some("Main St"));
        assert_eq!(row.count, Some(42.0));
        assert_eq!(row.crashes_per_month, Some(3.5));
        assert_eq!(row.injury_score, None);
    }

    #[test]
    fn parses_empty_result_message() {
        let body = serde_json::json!({
            "ranking": [],
            "rank_type": "weighted",
            "group_by": "location",
            "total_crashes": 0,
            "message": "No data matches your filter criteria"
        });
        let RankingResponse::Success(payload) = serde_json::from_value(body).unwrap() else {
            panic!("expected success");
        };
        assert!(payload.ranking.is_empty());
        assert_eq!(
            payload.message.as_deref(),
            Some("No data matches your filter criteria")
        );
    }

    #[test]
    fn error_field_takes_precedence() {
        let body = serde_json::json!({"error": "date range invalid"});
        assert_eq!(
            serde_json::from_value::<RankingResponse>(body).unwrap(),
            RankingResponse::Failure {
                error: "date range invalid".to_string()
            }
        );
    }

    #[test]
    fn rejects_unrecognized_bodies() {
        let body = serde_json::json!({"detail": [{"msg": "field required"}]});
        assert!(serde_json::from_value::<RankingResponse>(body).is_err());
    }

    #[test]
    fn query_params_put_required_fields_first() {
        let mut filters = FilterSet::default();
        filters.set(FilterValue::Cause(CauseCategory::NonUser), true);
        let query = RankingQuery::new(RankType::Dangerous, GroupBy::Location, filters);
        assert_eq!(
            query.to_params(),
            vec![
                ("rank_type", "dangerous".to_string()),
                ("group_by", "location".to_string()),
                ("limit", "10".to_string()),
                ("date_start", "2017-10-24".to_string()),
                ("date_end", "2025-10-24".to_string()),
                ("cause", "non_user".to_string()),
            ]
        );
    }
}
