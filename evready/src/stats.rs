//! Dataset-level summary statistics.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::country::CountryMetrics;

/// Numeric fields a ranking can be keyed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    #[serde(alias = "EIRI")]
    Eiri,
    Stations,
    GapValue,
    AvailabilityNorm,
}

impl Metric {
    /// Column header used when the metric is shown in a table.
    pub fn label(&self) -> &'static str {
        match self {
            Metric::Eiri => "EIRI",
            Metric::Stations => "Stations",
            Metric::GapValue => "Gap",
            Metric::AvailabilityNorm => "Availability",
        }
    }

    pub fn value(&self, country: &CountryMetrics) -> f64 {
        match self {
            Metric::Eiri => country.eiri,
            Metric::Stations => country.stations as f64,
            Metric::GapValue => country.gap_value,
            Metric::AvailabilityNorm => country.availability_norm,
        }
    }
}

pub fn total_stations(countries: &[CountryMetrics]) -> u64 {
    countries.iter().map(|country| country.stations).sum()
}

/// Mean composite score across the records. Returns NaN when `countries`
/// is empty.
pub fn average_eiri(countries: &[CountryMetrics]) -> f64 {
    let total: f64 = countries.iter().map(|country| country.eiri).sum();
    total / countries.len() as f64
}

/// Returns the record with the largest value of `metric`. When several
/// records share the largest value, the earliest one wins.
pub fn top_by_metric(countries: &[CountryMetrics], metric: Metric) -> Option<&CountryMetrics> {
    let mut best: Option<(&CountryMetrics, f64)> = None;
    for country in countries {
        let value = metric.value(country);
        let replace = match best {
            Some((_, best_value)) => value.total_cmp(&best_value) == Ordering::Greater,
            None => true,
        };
        if replace {
            best = Some((country, value));
        }
    }
    best.map(|(country, _)| country)
}

/// Headline numbers for a set of country records.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SummaryStats<'a> {
    pub country_count: usize,
    pub total_stations: u64,
    pub average_eiri: f64,
    pub readiness_leader: Option<&'a CountryMetrics>,
    pub highest_gap: Option<&'a CountryMetrics>,
}

pub fn summarize(countries: &[CountryMetrics]) -> SummaryStats<'_> {
    SummaryStats {
        country_count: countries.len(),
        total_stations: total_stations(countries),
        average_eiri: average_eiri(countries),
        readiness_leader: top_by_metric(countries, Metric::Eiri),
        highest_gap: top_by_metric(countries, Metric::GapValue),
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn country(code: &str, eiri: f64, stations: u64, gap_value: f64) -> CountryMetrics {
        CountryMetrics {
            country_code: code.to_string(),
            eiri,
            stations,
            gap_value,
            ..Default::default()
        }
    }

    #[test]
    fn summary_of_two_countries() {
        let countries = vec![
            country("AA", 80.0, 100, 10.0),
            country("BB", 40.0, 20, -2.0),
        ];
        let stats = summarize(&countries);
        assert_eq!(stats.country_count, 2);
        assert_eq!(stats.total_stations, 120);
        assert_eq!(stats.average_eiri, 60.0);
        assert_eq!(stats.readiness_leader.unwrap().country_code, "AA");
        assert_eq!(stats.highest_gap.unwrap().country_code, "AA");
    }

    #[test]
    fn summary_does_not_depend_on_record_order() {
        let forwards = vec![
            country("AA", 80.0, 100, 10.0),
            country("BB", 40.0, 20, -2.0),
            country("CC", 55.5, 7, 3.3),
        ];
        let mut backwards = forwards.clone();
        backwards.reverse();

        let forwards_stats = summarize(&forwards);
        let backwards_stats = summarize(&backwards);
        assert_eq!(forwards_stats.country_count, backwards_stats.country_count);
        assert_eq!(
            forwards_stats.total_stations,
            backwards_stats.total_stations
        );
        assert_eq!(forwards_stats.average_eiri, backwards_stats.average_eiri);
        assert_eq!(
            forwards_stats.readiness_leader,
            backwards_stats.readiness_leader
        );
        assert_eq!(forwards_stats.highest_gap, backwards_stats.highest_gap);
    }

    #[test]
    fn empty_dataset_summary() {
        let stats = summarize(&[]);
        assert_eq!(stats.country_count, 0);
        assert_eq!(stats.total_stations, 0);
        assert!(stats.average_eiri.is_nan());
        assert!(stats.readiness_leader.is_none());
        assert!(stats.highest_gap.is_none());
    }

    #[test]
    fn ties_go_to_the_earliest_record() {
        let countries = vec![country("AA", 50.0, 10, 1.0), country("BB", 50.0, 10, 1.0)];
        let top = top_by_metric(&countries, Metric::Eiri).unwrap();
        assert_eq!(top.country_code, "AA");
    }

    #[test]
    fn metric_parses_from_snake_case() {
        assert_eq!(Metric::from_str("gap_value").unwrap(), Metric::GapValue);
        assert_eq!(Metric::from_str("EIRI").unwrap(), Metric::Eiri);
        assert!(Metric::from_str("awesomeness").is_err());
    }
}
