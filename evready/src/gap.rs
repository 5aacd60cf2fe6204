//! Bucketing of countries by their demand/infrastructure gap.

use itertools::Itertools;
use nonempty::{nonempty, NonEmpty};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::country::CountryMetrics;

/// Station count a country must exceed before it is bucketed at all.
pub const DEFAULT_MIN_STATIONS: u64 = 50;

// Half-width of the balanced band, in gap points.
const GAP_BAND: f64 = 5.0;

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum GapCategory {
    /// Filter wildcard matching every bucket.
    #[default]
    All,
    Demand,
    Balanced,
    Infra,
}

impl GapCategory {
    /// Buckets a signed gap value: above the band demand is ahead, below it
    /// infrastructure is ahead, anything within the band (inclusive) is
    /// balanced.
    pub fn of(gap_value: f64) -> GapCategory {
        if gap_value > GAP_BAND {
            GapCategory::Demand
        } else if gap_value < -GAP_BAND {
            GapCategory::Infra
        } else {
            GapCategory::Balanced
        }
    }

    /// The concrete buckets, in display order. `All` is not a bucket.
    pub fn buckets() -> NonEmpty<GapCategory> {
        nonempty![GapCategory::Demand, GapCategory::Balanced, GapCategory::Infra]
    }

    pub fn label(&self) -> &'static str {
        match self {
            GapCategory::All => "All",
            GapCategory::Demand => "Demand Ahead",
            GapCategory::Balanced => "Balanced",
            GapCategory::Infra => "Infra Ahead",
        }
    }

    fn matches(&self, country: &CountryMetrics) -> bool {
        match self {
            GapCategory::All => true,
            _ => GapCategory::of(country.gap_value) == *self,
        }
    }
}

/// Selects countries for the gap surface.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GapFilter {
    /// Countries at or below this station count are dropped before
    /// bucketing.
    pub min_stations: u64,
    pub category: GapCategory,
}

impl Default for GapFilter {
    fn default() -> Self {
        Self {
            min_stations: DEFAULT_MIN_STATIONS,
            category: GapCategory::All,
        }
    }
}

/// Applies the station threshold and bucket selection, preserving record
/// order.
pub fn filter_by_gap_category<'a>(
    countries: &'a [CountryMetrics],
    filter: &GapFilter,
) -> Vec<&'a CountryMetrics> {
    countries
        .iter()
        .filter(|country| country.stations > filter.min_stations)
        .filter(|country| filter.category.matches(country))
        .collect()
}

/// Counts how many of the given records land in each bucket. Buckets with
/// no records still appear, with a zero count.
pub fn bucket_census(view: &[&CountryMetrics]) -> Vec<(GapCategory, usize)> {
    let counts = view
        .iter()
        .map(|country| GapCategory::of(country.gap_value))
        .counts();
    GapCategory::buckets()
        .into_iter()
        .map(|bucket| (bucket, counts.get(&bucket).copied().unwrap_or(0)))
        .collect()
}
