use anyhow::Result;
use dataset::Dataset;
use gap::GapFilter;
use log::debug;
use search::CountryFilter;
use sort::{SortDirection, SortField};
use stats::{Metric, SummaryStats};

use crate::{config::Config, country::CountryMetrics, error::EvreadyError};

// Re-exports
pub use column_names as COL;

// Modules
pub mod column_names;
pub mod config;
pub mod country;
pub mod dataset;
pub mod error;
#[cfg(feature = "formatters")]
pub mod formatters;
pub mod gap;
pub mod geo;
pub mod search;
pub mod sort;
pub mod stats;
pub mod view_spec;

/// Type for evready data and API
pub struct Evready {
    pub dataset: Dataset,
    pub config: Config,
}

impl Evready {
    /// Setup the Evready object with default configuration
    pub fn new() -> Result<Self> {
        Self::new_with_config(Config::default())
    }

    /// Setup the Evready object with custom configuration
    pub fn new_with_config(config: Config) -> Result<Self> {
        debug!("config: {config:?}");
        let dataset = Dataset::load(&config)?;
        Ok(Self { dataset, config })
    }

    pub fn countries(&self) -> &[CountryMetrics] {
        &self.dataset.countries
    }

    /// Headline statistics over the whole dataset
    pub fn summary(&self) -> SummaryStats<'_> {
        stats::summarize(self.countries())
    }

    /// The top `limit` countries by `metric`, largest first
    pub fn rank(&self, metric: Metric, limit: usize) -> Vec<&CountryMetrics> {
        sort::rank_top_n(self.countries(), metric, limit)
    }

    /// All countries ordered on a table column
    pub fn table(&self, field: SortField, direction: SortDirection) -> Vec<&CountryMetrics> {
        sort::sort_by(self.countries(), field, direction)
    }

    /// Countries passing the gap filter, in record order
    pub fn gap_view(&self, filter: &GapFilter) -> Vec<&CountryMetrics> {
        gap::filter_by_gap_category(self.countries(), filter)
    }

    /// Countries matching a text filter, in record order
    pub fn find_countries(
        &self,
        filter: &CountryFilter,
    ) -> Result<Vec<&CountryMetrics>, EvreadyError> {
        search::filter_countries(self.countries(), filter)
    }
}
