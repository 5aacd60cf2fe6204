//! Bounding box filtering over located countries.

use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::country::CountryMetrics;

/// A bounding box with coords in the order `[west, south, east, north]`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct BBox(pub [f64; 4]);

impl BBox {
    /// Whether a point lies inside the box. Points on the edges count as
    /// inside.
    pub fn contains(&self, lng: f64, lat: f64) -> bool {
        self.0[0] <= lng && lng <= self.0[2] && self.0[1] <= lat && lat <= self.0[3]
    }

    /// Whether a country has a marker location inside the box. Countries
    /// without one are never covered.
    pub fn covers(&self, country: &CountryMetrics) -> bool {
        country
            .location()
            .is_some_and(|(lng, lat)| self.contains(lng, lat))
    }
}

impl Index<usize> for BBox {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl IndexMut<usize> for BBox {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0[index]
    }
}

impl FromStr for BBox {
    type Err = &'static str;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let parts: Vec<f64> = value
            .split(',')
            .map(|coord| {
                coord
                    .trim()
                    .parse::<f64>()
                    .map_err(|_| "Failed to parse bbox coord to float")
            })
            .collect::<Result<Vec<_>, _>>()?;
        if parts.len() != 4 {
            return Err("Bounding boxes need to have 4 coords");
        }
        let mut bbox = [0.0; 4];
        bbox.copy_from_slice(&parts);
        Ok(BBox(bbox))
    }
}

/// Returns the located records inside `bbox`, preserving record order.
pub fn filter_bbox<'a>(countries: &'a [CountryMetrics], bbox: &BBox) -> Vec<&'a CountryMetrics> {
    countries
        .iter()
        .filter(|country| bbox.covers(country))
        .collect()
}
