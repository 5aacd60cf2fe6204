//! The per-country record of the precomputed readiness index.

use serde::{Deserialize, Serialize};
use strum_macros::Display;

/// One country's precomputed metrics. The collection is loaded once and
/// never mutated; every view over it is a freshly computed projection.
///
/// Field keys are serialized exactly as the upstream pipeline emits them
/// (including the upper-case `EIRI`).
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct CountryMetrics {
    /// Short unique identifier (ISO alpha-2 in the released data).
    pub country_code: String,
    /// Human-readable label; display falls back to the code when absent.
    #[serde(default)]
    pub country_name: Option<String>,
    /// Count of tracked charging stations.
    pub stations: u64,
    pub median_power_kw: f64,
    pub fast_dc_share: f64,
    pub unique_models: u64,
    pub coverage_norm: f64,
    pub capacity_norm: f64,
    pub fastshare_norm: f64,
    pub availability_norm: f64,
    /// Composite readiness score, conventionally in [0, 100].
    #[serde(rename = "EIRI")]
    pub eiri: f64,
    /// Signed demand/infrastructure gap. Positive means demand-side
    /// capacity runs ahead of infrastructure.
    pub gap_value: f64,
    /// Upstream cluster id and its mixture weights.
    pub cluster: u32,
    pub base: f64,
    pub infra_heavy: f64,
    pub availability_heavy: f64,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
}

impl CountryMetrics {
    /// The label shown for this country, falling back to the code when
    /// no name is present.
    pub fn display_name(&self) -> &str {
        self.country_name.as_deref().unwrap_or(&self.country_code)
    }

    /// The record's (lng, lat) position, when both coordinates are
    /// present and finite. Unlocated records are excluded from spatial
    /// output but still participate in aggregates.
    pub fn location(&self) -> Option<(f64, f64)> {
        match (self.lng, self.lat) {
            (Some(lng), Some(lat)) if lng.is_finite() && lat.is_finite() => Some((lng, lat)),
            _ => None,
        }
    }

    pub fn has_location(&self) -> bool {
        self.location().is_some()
    }

    /// The readiness band of the composite score.
    pub fn band(&self) -> ReadinessBand {
        ReadinessBand::from_eiri(self.eiri)
    }
}

/// Qualitative bands of the composite score, used to badge countries in
/// tabular output.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq)]
pub enum ReadinessBand {
    High,
    Medium,
    Low,
}

impl ReadinessBand {
    /// High above 60, Medium above 30, Low otherwise.
    pub fn from_eiri(eiri: f64) -> Self {
        if eiri > 60.0 {
            Self::High
        } else if eiri > 30.0 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_falls_back_to_code() {
        let named = CountryMetrics {
            country_code: "NO".to_string(),
            country_name: Some("Norway".to_string()),
            ..Default::default()
        };
        let unnamed = CountryMetrics {
            country_code: "XK".to_string(),
            ..Default::default()
        };
        assert_eq!(named.display_name(), "Norway");
        assert_eq!(unnamed.display_name(), "XK");
    }

    #[test]
    fn location_requires_both_finite_coords() {
        let located = CountryMetrics {
            lat: Some(59.91),
            lng: Some(10.75),
            ..Default::default()
        };
        assert_eq!(located.location(), Some((10.75, 59.91)));
        assert!(located.has_location());

        let missing_lng = CountryMetrics {
            lat: Some(59.91),
            ..Default::default()
        };
        assert_eq!(missing_lng.location(), None);

        let non_finite = CountryMetrics {
            lat: Some(f64::NAN),
            lng: Some(10.75),
            ..Default::default()
        };
        assert!(!non_finite.has_location());
    }

    #[test]
    fn readiness_band_boundaries() {
        assert_eq!(ReadinessBand::from_eiri(60.1), ReadinessBand::High);
        assert_eq!(ReadinessBand::from_eiri(60.0), ReadinessBand::Medium);
        assert_eq!(ReadinessBand::from_eiri(30.1), ReadinessBand::Medium);
        assert_eq!(ReadinessBand::from_eiri(30.0), ReadinessBand::Low);
        assert_eq!(ReadinessBand::from_eiri(0.0), ReadinessBand::Low);
    }

    #[test]
    fn deserializes_upstream_keys() {
        let raw = r#"{
            "country_code": "NO",
            "stations": 9200,
            "median_power_kw": 150.0,
            "fast_dc_share": 0.42,
            "unique_models": 61,
            "coverage_norm": 88.0,
            "capacity_norm": 90.5,
            "fastshare_norm": 82.0,
            "availability_norm": 86.0,
            "EIRI": 87.2,
            "gap_value": -12.0,
            "cluster": 2,
            "base": 0.2,
            "infra_heavy": 0.6,
            "availability_heavy": 0.2
        }"#;
        let country: CountryMetrics = serde_json::from_str(raw).unwrap();
        assert_eq!(country.eiri, 87.2);
        assert_eq!(country.country_name, None);
        assert_eq!(country.location(), None);
        assert_eq!(country.band(), ReadinessBand::High);
    }
}
