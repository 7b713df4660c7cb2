use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::MapError;
use crate::geo::LatLng;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CountryCoords {
    pub latitude: f64,
    pub longitude: f64,
}

impl From<CountryCoords> for LatLng {
    fn from(c: CountryCoords) -> Self {
        LatLng::new(c.latitude, c.longitude)
    }
}

/// Projects running in one country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectRecord {
    pub country_coords: CountryCoords,
    pub project_count: u32,
    pub country_name: String,
}

/// Project records keyed by an arbitrary index string, as published by the site.
pub type ProjectRecords = BTreeMap<String, ProjectRecord>;

impl ProjectRecord {
    /// Check the fields a marker needs. `key` is only used for the error message.
    pub fn validate(&self, key: &str) -> Result<(), MapError> {
        let invalid = |reason: String| MapError::InvalidRecord {
            key: key.to_string(),
            reason,
        };
        let CountryCoords {
            latitude,
            longitude,
        } = self.country_coords;

        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(invalid(format!("latitude {} is outside -90..=90", latitude)));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(invalid(format!(
                "longitude {} is outside -180..=180",
                longitude
            )));
        }
        if self.country_name.trim().is_empty() {
            return Err(invalid("country_name is blank".to_string()));
        }
        Ok(())
    }
}

/// Parse the published JSON object of project records.
pub fn parse_project_records(json: &str) -> Result<ProjectRecords, String> {
    serde_json::from_str(json).map_err(|e| format!("Failed to parse project records: {}", e))
}

/// Validate every record, reporting the first failure.
pub fn validate_records(records: &ProjectRecords) -> Result<(), MapError> {
    records
        .iter()
        .try_for_each(|(key, record)| record.validate(key))
}

pub const DEFAULT_TILE_URL: &str = "https://tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const DEFAULT_TILE_ATTRIBUTION: &str = "© OpenStreetMap contributors";

/// Site-wide values the page needs: where static files live and where tiles come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SiteConfig {
    pub base_url: String,
    pub tile_url: String,
    pub tile_attribution: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            base_url: String::new(),
            tile_url: DEFAULT_TILE_URL.to_string(),
            tile_attribution: DEFAULT_TILE_ATTRIBUTION.to_string(),
        }
    }
}

impl SiteConfig {
    /// Join a site-relative path onto the base URL without doubling slashes.
    pub fn asset_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(lat: f64, lng: f64, name: &str) -> ProjectRecord {
        ProjectRecord {
            country_coords: CountryCoords {
                latitude: lat,
                longitude: lng,
            },
            project_count: 4,
            country_name: name.to_string(),
        }
    }

    #[test]
    fn test_parse_project_records() {
        let json = r#"{
            "0": {"country_coords": {"latitude": -1.29, "longitude": 36.82}, "project_count": 12, "country_name": "Kenya"},
            "1": {"country_coords": {"latitude": 9.08, "longitude": 8.68}, "project_count": 3, "country_name": "Nigeria"}
        }"#;
        let records = parse_project_records(json).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records["0"].country_name, "Kenya");
        assert_eq!(records["0"].project_count, 12);
        assert_eq!(records["1"].country_coords.longitude, 8.68);
    }

    #[test]
    fn test_parse_project_records_missing_field() {
        let json = r#"{"0": {"country_coords": {"latitude": 1.0, "longitude": 2.0}, "country_name": "Chad"}}"#;
        let err = parse_project_records(json).unwrap_err();
        assert!(err.contains("project_count"));
    }

    #[test]
    fn test_parse_project_records_negative_count() {
        let json = r#"{"0": {"country_coords": {"latitude": 1.0, "longitude": 2.0}, "project_count": -2, "country_name": "Chad"}}"#;
        assert!(parse_project_records(json).is_err());
    }

    #[test]
    fn test_validate_accepts_good_record() {
        assert!(record(-1.29, 36.82, "Kenya").validate("0").is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range_latitude() {
        let err = record(95.0, 0.0, "Nowhere").validate("5").unwrap_err();
        match err {
            MapError::InvalidRecord { key, reason } => {
                assert_eq!(key, "5");
                assert!(reason.contains("latitude"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_nan_longitude() {
        assert!(record(0.0, f64::NAN, "Nowhere").validate("1").is_err());
    }

    #[test]
    fn test_validate_rejects_blank_name() {
        assert!(record(0.0, 0.0, "   ").validate("2").is_err());
    }

    #[test]
    fn test_validate_records_reports_first_bad_key() {
        let mut records = ProjectRecords::new();
        records.insert("a".into(), record(0.0, 0.0, "Ghana"));
        records.insert("b".into(), record(0.0, 200.0, "Bad"));
        records.insert("c".into(), record(100.0, 0.0, "Worse"));
        match validate_records(&records) {
            Err(MapError::InvalidRecord { key, .. }) => assert_eq!(key, "b"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_site_config_defaults_when_fields_missing() {
        let cfg: SiteConfig = serde_json::from_str(r#"{"baseUrl": "https://example.org"}"#).unwrap();
        assert_eq!(cfg.base_url, "https://example.org");
        assert_eq!(cfg.tile_url, DEFAULT_TILE_URL);
    }

    #[test]
    fn test_asset_url_joins_without_double_slash() {
        let cfg = SiteConfig {
            base_url: "https://example.org/".to_string(),
            ..SiteConfig::default()
        };
        assert_eq!(
            cfg.asset_url("/static/images/close.svg"),
            "https://example.org/static/images/close.svg"
        );
    }

    #[test]
    fn test_asset_url_with_empty_base_is_root_relative() {
        let cfg = SiteConfig::default();
        assert_eq!(cfg.asset_url("static/a.png"), "/static/a.png");
    }
}
