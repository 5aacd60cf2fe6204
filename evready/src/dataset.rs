//! Loading and validation of readiness dataset releases.

use std::collections::HashSet;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{config::Config, country::CountryMetrics, error::EvreadyError, COL};

/// Describes the release a set of country records was taken from.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct DatasetInfo {
    /// Human readable name of the release.
    pub name: String,
    /// The year the underlying station registry snapshots refer to.
    pub reference_year: u16,
    /// Date the registry snapshot was taken, if the release records one.
    #[serde(default)]
    pub snapshot_date: Option<NaiveDate>,
}

/// A validated collection of country records together with its release info.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Dataset {
    pub info: DatasetInfo,
    pub countries: Vec<CountryMetrics>,
}

impl Dataset {
    /// Returns the release embedded in the crate.
    pub fn builtin() -> Self {
        // Unwrap: the embedded release is checked by the tests below.
        include_str!("../data/ev_readiness.json")
            .parse()
            .expect("embedded dataset should parse and validate")
    }

    /// Reads and validates a dataset from a JSON file on disk.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, EvreadyError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|source| EvreadyError::DatasetRead {
                path: path.to_path_buf(),
                source,
            })?;
        contents.parse()
    }

    /// Loads the dataset named by `config.data_path`, falling back to the
    /// embedded release when no path is configured.
    pub fn load(config: &Config) -> Result<Self, EvreadyError> {
        match &config.data_path {
            Some(path) => {
                info!("Loading dataset from {}", path.display());
                Self::from_path(path)
            }
            None => {
                info!("Loading embedded dataset");
                Ok(Self::builtin())
            }
        }
    }

    fn validate(&self) -> Result<(), EvreadyError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for (index, country) in self.countries.iter().enumerate() {
            if country.country_code.is_empty() {
                return Err(EvreadyError::EmptyCountryCode { index });
            }
            if !seen.insert(&country.country_code) {
                return Err(EvreadyError::DuplicateCountryCode(
                    country.country_code.clone(),
                ));
            }
        }
        Ok(())
    }

    // The index pipeline emits normalised components and the composite on a
    // 0-100 scale. Values outside that range are kept, but flagged.
    fn warn_out_of_convention(&self) {
        for country in &self.countries {
            let normalised = [
                (COL::COVERAGE_NORM, country.coverage_norm),
                (COL::CAPACITY_NORM, country.capacity_norm),
                (COL::FASTSHARE_NORM, country.fastshare_norm),
                (COL::AVAILABILITY_NORM, country.availability_norm),
                (COL::EIRI, country.eiri),
            ];
            for (name, value) in normalised {
                if !value.is_finite() || !(0.0..=100.0).contains(&value) {
                    warn!(
                        "Country '{}': {name} is {value}, outside the expected 0-100 range",
                        country.country_code
                    );
                }
            }
        }
    }
}

impl FromStr for Dataset {
    type Err = EvreadyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let dataset: Dataset = serde_json::from_str(s)?;
        dataset.validate()?;
        dataset.warn_out_of_convention();
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn sample(codes: &[&str]) -> Dataset {
        Dataset {
            info: DatasetInfo {
                name: "test release".to_string(),
                reference_year: 2024,
                snapshot_date: None,
            },
            countries: codes
                .iter()
                .map(|code| CountryMetrics {
                    country_code: code.to_string(),
                    ..Default::default()
                })
                .collect(),
        }
    }

    #[test]
    fn builtin_dataset_parses_and_validates() {
        let dataset = Dataset::builtin();
        assert!(dataset.countries.len() > 30);
        assert_eq!(dataset.info.reference_year, 2024);
    }

    #[test]
    fn duplicate_country_codes_are_rejected() {
        let raw = serde_json::to_string(&sample(&["NO", "SE", "NO"])).unwrap();
        let result = raw.parse::<Dataset>();
        assert!(
            matches!(result, Err(EvreadyError::DuplicateCountryCode(code)) if code == "NO")
        );
    }

    #[test]
    fn empty_country_codes_are_rejected() {
        let raw = serde_json::to_string(&sample(&["NO", ""])).unwrap();
        let result = raw.parse::<Dataset>();
        assert!(matches!(
            result,
            Err(EvreadyError::EmptyCountryCode { index: 1 })
        ));
    }

    #[test]
    fn reads_dataset_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let raw = serde_json::to_string(&sample(&["NO", "SE"])).unwrap();
        file.write_all(raw.as_bytes()).unwrap();

        let dataset = Dataset::from_path(file.path()).unwrap();
        assert_eq!(dataset.countries.len(), 2);
    }

    #[test]
    fn missing_dataset_path_is_an_error() {
        let result = Dataset::from_path("/definitely/not/here.json");
        assert!(matches!(result, Err(EvreadyError::DatasetRead { .. })));
    }

    #[test]
    fn load_respects_config_override() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let raw = serde_json::to_string(&sample(&["NO", "SE"])).unwrap();
        file.write_all(raw.as_bytes()).unwrap();

        let config = Config {
            data_path: Some(file.path().to_path_buf()),
        };
        let dataset = Dataset::load(&config).unwrap();
        assert_eq!(dataset.countries.len(), 2);

        let builtin = Dataset::load(&Config::default()).unwrap();
        assert_eq!(builtin, Dataset::builtin());
    }
}
