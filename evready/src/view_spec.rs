//! Declarative view specifications, as stored in JSON report files.

use std::str::FromStr;

use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::{
    error::EvreadyError,
    gap::GapFilter,
    search::{CountryFilter, SearchConfig, SearchContext},
    sort::{SortState, DEFAULT_RANK_LIMIT},
    stats::Metric,
};

/// The dashboard surface a view renders.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Surface {
    #[default]
    Summary,
    Rank,
    Table,
    Gap,
}

/// A view specification as it appears in a JSON file. Enum-valued fields
/// are kept as plain strings here and are only checked in the conversion
/// to [ViewParams].
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ViewSpec {
    /// Optional heading shown above the rendered view.
    pub name: Option<String>,
    pub surface: Surface,
    pub metric: Option<String>,
    pub sort_by: Option<String>,
    pub direction: Option<String>,
    pub category: Option<String>,
    pub limit: Option<usize>,
    pub min_stations: Option<u64>,
    pub filter: Option<FilterSpec>,
}

/// Text filter section of a view specification.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterSpec {
    pub text: String,
    pub context: Option<Vec<SearchContext>>,
    pub match_type: Option<String>,
    pub case_sensitivity: Option<String>,
}

/// A fully checked view, ready to be rendered.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewParams {
    Summary,
    Rank {
        metric: Metric,
        limit: usize,
    },
    Table {
        state: SortState,
        filter: Option<CountryFilter>,
    },
    Gap {
        filter: GapFilter,
    },
}

fn parse_field<T: FromStr>(raw: &str, what: &str) -> Result<T, EvreadyError> {
    raw.parse()
        .map_err(|_| EvreadyError::InvalidViewSpec(format!("unknown {what}: {raw}")))
}

impl TryFrom<ViewSpec> for ViewParams {
    type Error = EvreadyError;

    fn try_from(spec: ViewSpec) -> Result<Self, Self::Error> {
        match spec.surface {
            Surface::Summary => Ok(ViewParams::Summary),
            Surface::Rank => {
                let metric = match &spec.metric {
                    Some(raw) => parse_field(raw, "metric")?,
                    None => Metric::Eiri,
                };
                Ok(ViewParams::Rank {
                    metric,
                    limit: spec.limit.unwrap_or(DEFAULT_RANK_LIMIT),
                })
            }
            Surface::Table => {
                let mut state = SortState::default();
                if let Some(raw) = &spec.sort_by {
                    state.field = parse_field(raw, "sort field")?;
                }
                if let Some(raw) = &spec.direction {
                    state.direction = parse_field(raw, "direction")?;
                }
                let filter = spec.filter.map(CountryFilter::try_from).transpose()?;
                Ok(ViewParams::Table { state, filter })
            }
            Surface::Gap => {
                let mut filter = GapFilter::default();
                if let Some(raw) = &spec.category {
                    filter.category = parse_field(raw, "gap category")?;
                }
                if let Some(min_stations) = spec.min_stations {
                    filter.min_stations = min_stations;
                }
                Ok(ViewParams::Gap { filter })
            }
        }
    }
}

impl TryFrom<FilterSpec> for CountryFilter {
    type Error = EvreadyError;

    fn try_from(spec: FilterSpec) -> Result<Self, Self::Error> {
        let context = match spec.context {
            Some(context) => NonEmpty::from_vec(context).ok_or_else(|| {
                EvreadyError::InvalidViewSpec("filter context cannot be empty".to_string())
            })?,
            None => SearchContext::all(),
        };
        let mut config = SearchConfig::default();
        if let Some(raw) = &spec.match_type {
            config.match_type = parse_field(raw, "match type")?;
        }
        if let Some(raw) = &spec.case_sensitivity {
            config.case_sensitivity = parse_field(raw, "case sensitivity")?;
        }
        Ok(CountryFilter {
            text: spec.text,
            context,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use nonempty::nonempty;

    use super::*;
    use crate::{
        gap::GapCategory,
        search::MatchType,
        sort::{SortDirection, SortField},
    };

    fn params(raw: &str) -> Result<ViewParams, EvreadyError> {
        let spec: ViewSpec = serde_json::from_str(raw).unwrap();
        spec.try_into()
    }

    #[test]
    fn minimal_spec_is_a_summary() {
        assert_eq!(params("{}").unwrap(), ViewParams::Summary);
    }

    #[test]
    fn rank_spec_parses_metric_and_limit() {
        let parsed = params(r#"{"surface": "rank", "metric": "gap_value", "limit": 5}"#).unwrap();
        assert_eq!(
            parsed,
            ViewParams::Rank {
                metric: Metric::GapValue,
                limit: 5
            }
        );
    }

    #[test]
    fn rank_spec_defaults_to_the_composite() {
        let parsed = params(r#"{"surface": "rank"}"#).unwrap();
        assert_eq!(
            parsed,
            ViewParams::Rank {
                metric: Metric::Eiri,
                limit: DEFAULT_RANK_LIMIT
            }
        );
    }

    #[test]
    fn table_spec_carries_sort_state_and_filter() {
        let raw = r#"{
            "name": "Nordic stations",
            "surface": "table",
            "sortBy": "stations",
            "direction": "ascending",
            "filter": {
                "text": "nor",
                "context": ["countryName"],
                "matchType": "startswith"
            }
        }"#;
        let parsed = params(raw).unwrap();
        let expected_filter = CountryFilter {
            text: "nor".to_string(),
            context: nonempty![SearchContext::CountryName],
            config: SearchConfig {
                match_type: MatchType::Startswith,
                ..Default::default()
            },
        };
        assert_eq!(
            parsed,
            ViewParams::Table {
                state: SortState {
                    field: SortField::Stations,
                    direction: SortDirection::Ascending
                },
                filter: Some(expected_filter)
            }
        );
    }

    #[test]
    fn gap_spec_overrides_the_threshold() {
        let parsed = params(r#"{"surface": "gap", "category": "demand", "minStations": 100}"#)
            .unwrap();
        assert_eq!(
            parsed,
            ViewParams::Gap {
                filter: GapFilter {
                    min_stations: 100,
                    category: GapCategory::Demand
                }
            }
        );
    }

    #[test]
    fn unknown_metrics_are_rejected() {
        let result = params(r#"{"surface": "rank", "metric": "awesomeness"}"#);
        assert!(matches!(result, Err(EvreadyError::InvalidViewSpec(_))));
    }

    #[test]
    fn empty_filter_contexts_are_rejected() {
        let result = params(r#"{"surface": "table", "filter": {"text": "x", "context": []}}"#);
        assert!(matches!(result, Err(EvreadyError::InvalidViewSpec(_))));
    }
}
