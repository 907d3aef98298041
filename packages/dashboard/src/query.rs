//! Service endpoint URLs.
//!
//! Both outbound artifacts, the map frame source and the ranking request,
//! take their filter parameters from
//! [`crash_map_dashboard_models::build_filter_params`], so they always agree
//! on which filters are sent and which are omitted.

use crash_map_dashboard_models::{FilterSet, RankingQuery, build_filter_params};
use reqwest::Url;

use crate::DashboardError;

/// Validated base URL of the crash data service with its endpoints resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase {
    root: Url,
    map: Url,
    ranking: Url,
}

impl ApiBase {
    /// Parses a base URL such as `http://127.0.0.1:8000` or
    /// `https://example.org/crashes`.
    ///
    /// A path prefix is kept: endpoints resolve beneath it.
    ///
    /// # Errors
    ///
    /// Returns [`DashboardError::InvalidBaseUrl`] if `base` is not an
    /// absolute `http`/`https` URL.
    pub fn parse(base: &str) -> Result<Self, DashboardError> {
        let invalid = |message: String| DashboardError::InvalidBaseUrl {
            url: base.to_string(),
            message,
        };

        let trimmed = base.trim();
        let with_slash = if trimmed.ends_with('/') {
            trimmed.to_string()
        } else {
            format!("{trimmed}/")
        };

        let root = Url::parse(&with_slash).map_err(|e| invalid(e.to_string()))?;
        if !matches!(root.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {:?}", root.scheme())));
        }
        if root.query().is_some() || root.fragment().is_some() {
            return Err(invalid("base URL must not carry a query or fragment".to_string()));
        }

        let map = root.join("api/map").map_err(|e| invalid(e.to_string()))?;
        let ranking = root.join("api/ranking").map_err(|e| invalid(e.to_string()))?;

        Ok(Self { root, map, ranking })
    }

    /// The service root, also its health check endpoint.
    #[must_use]
    pub const fn root(&self) -> &Url {
        &self.root
    }

    /// Map frame source for `filters`.
    #[must_use]
    pub fn map_url(&self, filters: &FilterSet) -> Url {
        with_query(&self.map, &build_filter_params(filters))
    }

    /// Ranking request URL for `query`.
    #[must_use]
    pub fn ranking_url(&self, query: &RankingQuery) -> Url {
        with_query(&self.ranking, &query.to_params())
    }
}

impl std::fmt::Display for ApiBase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.root.as_str().trim_end_matches('/'))
    }
}

fn with_query(endpoint: &Url, params: &[(&'static str, String)]) -> Url {
    let mut url = endpoint.clone();
    if params.is_empty() {
        return url;
    }
    url.query_pairs_mut()
        .extend_pairs(params.iter().map(|(key, value)| (*key, value.as_str())));
    url
}

#[cfg(test)]
mod tests {
    use super::*;
    use crash_map_crash_models::{DamageLevel, GroupBy, LightingCondition, RankType};
    use crash_map_dashboard_models::FilterValue;

    fn api() -> ApiBase {
        ApiBase::parse("http://127.0.0.1:8000").unwrap()
    }

    #[test]
    fn default_filters_only_carry_dates() {
        let url = api().map_url(&FilterSet::default());
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:8000/api/map?date_start=2017-10-24&date_end=2025-10-24"
        );
    }

    #[test]
    fn encodes_wire_literals_as_form_data() {
        let mut filters = FilterSet::default();
        filters.date_start = None;
        filters.date_end = None;
        filters.set(FilterValue::Damage(DamageLevel::UpTo500), true);
        filters.set(FilterValue::Lighting(LightingCondition::DarknessLightedRoad), true);
        let url = api().map_url(&filters);
        assert_eq!(
            url.query(),
            Some("damage=%24500+OR+LESS&lighting=DARKNESS%2C+LIGHTED+ROAD")
        );
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![
                ("damage".to_string(), "$500 OR LESS".to_string()),
                ("lighting".to_string(), "DARKNESS, LIGHTED ROAD".to_string()),
            ]
        );
    }

    #[test]
    fn map_and_ranking_share_filter_params() {
        let mut filters = FilterSet::default();
        filters.set(FilterValue::Damage(DamageLevel::Over1500), true);
        let map = api().map_url(&filters);
        let ranking = api().ranking_url(&RankingQuery::new(
            RankType::Weighted,
            GroupBy::Street,
            filters,
        ));
        assert_eq!(ranking.path(), "/api/ranking");
        let ranking_query = ranking.query().unwrap();
        assert!(ranking_query.starts_with("rank_type=weighted&group_by=street&limit=10&"));
        assert!(ranking_query.ends_with(map.query().unwrap()));
    }

    #[test]
    fn no_params_means_no_query() {
        let filters = FilterSet {
            date_start: None,
            date_end: None,
            ..FilterSet::default()
        };
        assert_eq!(
            api().map_url(&filters).as_str(),
            "http://127.0.0.1:8000/api/map"
        );
    }

    #[test]
    fn keeps_path_prefix() {
        let api = ApiBase::parse("https://example.org/crashes").unwrap();
        assert_eq!(
            api.map_url(&FilterSet::default()).path(),
            "/crashes/api/map"
        );
        assert_eq!(api.to_string(), "https://example.org/crashes");
    }

    #[test]
    fn rejects_unusable_bases() {
        assert!(ApiBase::parse("127.0.0.1:8000").is_err());
        assert!(ApiBase::parse("ftp://example.org").is_err());
        assert!(ApiBase::parse("http://example.org/?x=1").is_err());
    }
}
