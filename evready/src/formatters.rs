use anyhow::Result;
use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::io::Write;

use crate::{country::CountryMetrics, COL};

/// Trait to define different output generators. Defines two functions,
/// format which generates a serialized string of the given records and
/// save which writes it to the given writer
#[enum_dispatch]
pub trait OutputGenerator {
    fn save(&self, writer: &mut impl Write, countries: &[&CountryMetrics]) -> Result<()>;
    fn format(&self, countries: &[&CountryMetrics]) -> Result<String> {
        // Just creating an empty vec to store the buffered output
        let mut data: Vec<u8> = vec![];
        let mut buff = Cursor::new(&mut data);
        self.save(&mut buff, countries)?;

        Ok(String::from_utf8(data)?)
    }
}

/// Enum of OutputFormatters one for each potential
/// output type
#[enum_dispatch(OutputGenerator)]
#[derive(Serialize, Deserialize, Debug)]
pub enum OutputFormatter {
    Csv(CSVFormatter),
    Json(JSONFormatter),
    GeoJSON(GeoJSONFormatter),
}

/// Format the records as a CSV file with one row per country
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct CSVFormatter;

impl OutputGenerator for CSVFormatter {
    fn save(&self, writer: &mut impl Write, countries: &[&CountryMetrics]) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for country in countries {
            csv_writer.serialize(country)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// Format the records as a JSON array
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct JSONFormatter;

impl OutputGenerator for JSONFormatter {
    fn save(&self, writer: &mut impl Write, countries: &[&CountryMetrics]) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, countries)?;
        writeln!(writer)?;
        Ok(())
    }
}

/// Format the records as a geojson file with one point feature per
/// located country. Countries without a marker location are skipped.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct GeoJSONFormatter;

impl OutputGenerator for GeoJSONFormatter {
    fn format(&self, countries: &[&CountryMetrics]) -> Result<String> {
        let mut features: Vec<geojson::Feature> = vec![];

        for country in countries {
            let Some((lng, lat)) = country.location() else {
                continue;
            };
            let mut properties = serde_json::to_value(country)?
                .as_object()
                .cloned()
                .unwrap_or_default();
            // The marker location becomes the feature geometry
            properties.remove(COL::LAT);
            properties.remove(COL::LNG);

            let feature = geojson::Feature {
                geometry: Some(geojson::Geometry::new(geojson::Value::Point(vec![
                    lng, lat,
                ]))),
                properties: Some(properties),
                bbox: None,
                id: None,
                foreign_members: None,
            };
            features.push(feature);
        }

        let feature_collection = geojson::FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        };
        Ok(feature_collection.to_string())
    }

    fn save(&self, writer: &mut impl Write, countries: &[&CountryMetrics]) -> Result<()> {
        let result = self.format(countries)?;
        writer.write_all(result.as_bytes())?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Vec<CountryMetrics> {
        vec![
            CountryMetrics {
                country_code: "NO".to_string(),
                country_name: Some("Norway".to_string()),
                stations: 9214,
                eiri: 87.3,
                lat: Some(59.91),
                lng: Some(10.75),
                ..Default::default()
            },
            CountryMetrics {
                country_code: "AE".to_string(),
                country_name: Some("United Arab Emirates".to_string()),
                stations: 432,
                eiri: 59.0,
                ..Default::default()
            },
        ]
    }

    #[test]
    fn csv_output_has_a_header_and_one_row_per_record() {
        let countries = fixture();
        let view: Vec<&CountryMetrics> = countries.iter().collect();
        let output = CSVFormatter.format(&view).unwrap();

        let lines: Vec<&str> = output.trim_end().lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains(COL::COUNTRY_CODE));
        assert!(lines[0].contains(COL::EIRI));
        assert!(lines[1].starts_with("NO,"));
        assert!(lines[2].starts_with("AE,"));
    }

    #[test]
    fn json_output_parses_back_to_the_records() {
        let countries = fixture();
        let view: Vec<&CountryMetrics> = countries.iter().collect();
        let output = JSONFormatter.format(&view).unwrap();

        let parsed: Vec<CountryMetrics> = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed, countries);
    }

    #[test]
    fn geojson_output_skips_unlocated_records() {
        let countries = fixture();
        let view: Vec<&CountryMetrics> = countries.iter().collect();
        let output = GeoJSONFormatter.format(&view).unwrap();

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        let features = parsed["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);

        let feature = &features[0];
        assert_eq!(feature["properties"][COL::COUNTRY_CODE], "NO");
        assert!(feature["properties"].get(COL::LAT).is_none());
        assert!(feature["properties"].get(COL::LNG).is_none());
        assert_eq!(
            feature["geometry"]["coordinates"],
            serde_json::json!([10.75, 59.91])
        );
    }
}
