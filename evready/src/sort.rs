//! Ordering and ranking of country records.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::{country::CountryMetrics, stats::Metric};

/// Number of records a ranking shows when no limit is given.
pub const DEFAULT_RANK_LIMIT: usize = 10;

/// A column of the country table that can be sorted on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    CountryCode,
    CountryName,
    Stations,
    MedianPowerKw,
    FastDcShare,
    UniqueModels,
    CoverageNorm,
    CapacityNorm,
    FastshareNorm,
    AvailabilityNorm,
    #[serde(alias = "EIRI")]
    Eiri,
    GapValue,
    Cluster,
    Base,
    InfraHeavy,
    AvailabilityHeavy,
    Lat,
    Lng,
}

impl SortField {
    /// Ascending ordering of two records on this column.
    pub fn compare(&self, a: &CountryMetrics, b: &CountryMetrics) -> Ordering {
        match self {
            SortField::CountryCode => compare_str(&a.country_code, &b.country_code),
            SortField::CountryName => compare_str(a.display_name(), b.display_name()),
            _ => self.numeric_value(a).total_cmp(&self.numeric_value(b)),
        }
    }

    fn numeric_value(&self, country: &CountryMetrics) -> f64 {
        let value = match self {
            SortField::Stations => country.stations as f64,
            SortField::MedianPowerKw => country.median_power_kw,
            SortField::FastDcShare => country.fast_dc_share,
            SortField::UniqueModels => country.unique_models as f64,
            SortField::CoverageNorm => country.coverage_norm,
            SortField::CapacityNorm => country.capacity_norm,
            SortField::FastshareNorm => country.fastshare_norm,
            SortField::AvailabilityNorm => country.availability_norm,
            SortField::Eiri => country.eiri,
            SortField::GapValue => country.gap_value,
            SortField::Cluster => country.cluster as f64,
            SortField::Base => country.base,
            SortField::InfraHeavy => country.infra_heavy,
            SortField::AvailabilityHeavy => country.availability_heavy,
            // TODO: sort absent coordinates last once the upstream pipeline
            // distinguishes missing from zero.
            SortField::Lat => country.lat.unwrap_or(0.0),
            SortField::Lng => country.lng.unwrap_or(0.0),
            // String columns are ordered in `compare`, not here.
            SortField::CountryCode | SortField::CountryName => 0.0,
        };
        if value.is_finite() {
            value
        } else {
            0.0
        }
    }
}

// Case-insensitive ordering with a case-sensitive tie-break, so strings
// that differ only by case still order deterministically.
fn compare_str(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    #[default]
    Descending,
}

impl SortDirection {
    pub fn toggled(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// Sort state of a country table: the active column and its direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Default for SortState {
    fn default() -> Self {
        Self {
            field: SortField::Eiri,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// Applies a header selection: a new column starts descending, selecting
    /// the active column flips its direction.
    pub fn select(&self, field: SortField) -> Self {
        if self.field == field {
            Self {
                field,
                direction: self.direction.toggled(),
            }
        } else {
            Self {
                field,
                direction: SortDirection::default(),
            }
        }
    }

    pub fn sort<'a>(&self, countries: &'a [CountryMetrics]) -> Vec<&'a CountryMetrics> {
        sort_by(countries, self.field, self.direction)
    }
}

/// Returns the records ordered on `field`. The sort is stable, so records
/// that compare equal keep their input order in either direction.
pub fn sort_by(
    countries: &[CountryMetrics],
    field: SortField,
    direction: SortDirection,
) -> Vec<&CountryMetrics> {
    sort_view(countries.iter().collect(), field, direction)
}

/// Orders an existing view without touching the backing records.
pub fn sort_view(
    mut view: Vec<&CountryMetrics>,
    field: SortField,
    direction: SortDirection,
) -> Vec<&CountryMetrics> {
    view.sort_by(|a, b| {
        let ordering = field.compare(a, b);
        match direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });
    view
}

/// The `n` largest records by `metric`, largest first. Ties keep their
/// input order, so a tie at the cut favours earlier records.
pub fn rank_top_n(countries: &[CountryMetrics], metric: Metric, n: usize) -> Vec<&CountryMetrics> {
    let mut view: Vec<&CountryMetrics> = countries.iter().collect();
    view.sort_by(|a, b| metric.value(b).total_cmp(&metric.value(a)));
    view.truncate(n);
    view
}
