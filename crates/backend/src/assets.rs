use std::path::Path;

use project_map_shared::models::{self, ProjectRecord, ProjectRecords, SiteConfig};
use project_map_shared::style::{self, StyleRule};

pub struct Assets {
    pub projects: ProjectRecords,
    pub site: SiteConfig,
    pub styles: Vec<StyleRule>,
}

impl Assets {
    /// Load `projects.json` (required) and `site.json` (optional) from `assets_dir`.
    pub fn load(assets_dir: &Path) -> Result<Self, String> {
        let projects_path = assets_dir.join("projects.json");
        let site_path = assets_dir.join("site.json");

        let projects_data = std::fs::read_to_string(&projects_path)
            .map_err(|e| format!("Failed to read {}: {}", projects_path.display(), e))?;
        let projects = models::parse_project_records(&projects_data)?;
        models::validate_records(&projects)
            .map_err(|e| format!("{}: {}", projects_path.display(), e))?;

        let site = if site_path.exists() {
            let site_data = std::fs::read_to_string(&site_path)
                .map_err(|e| format!("Failed to read {}: {}", site_path.display(), e))?;
            serde_json::from_str(&site_data)
                .map_err(|e| format!("Failed to parse site.json: {}", e))?
        } else {
            tracing::warn!(path = %site_path.display(), "No site config, using defaults");
            SiteConfig::default()
        };

        tracing::info!(
            projects = projects.len(),
            base_url = %site.base_url,
            "Loaded project map assets"
        );

        Ok(Assets {
            projects,
            site,
            styles: style::default_styles(),
        })
    }

    pub fn find_project(&self, key: &str) -> Option<&ProjectRecord> {
        self.projects.get(key)
    }

    pub fn total_projects(&self) -> u64 {
        self.projects.values().map(|p| p.project_count as u64).sum()
    }

    pub fn styles_json(&self) -> Result<String, String> {
        serde_json::to_string(&self.styles).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PROJECTS: &str = r#"{
        "0": {"country_coords": {"latitude": -1.29, "longitude": 36.82}, "project_count": 12, "country_name": "Kenya"},
        "1": {"country_coords": {"latitude": 9.08, "longitude": 8.68}, "project_count": 3, "country_name": "Nigeria"}
    }"#;

    fn write(dir: &Path, name: &str, content: &str) {
        std::fs::write(dir.join(name), content).unwrap();
    }

    #[test]
    fn test_load_projects_and_site() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "projects.json", PROJECTS);
        write(dir.path(), "site.json", r#"{"baseUrl": "https://example.org"}"#);

        let assets = Assets::load(dir.path()).unwrap();
        assert_eq!(assets.projects.len(), 2);
        assert_eq!(assets.site.base_url, "https://example.org");
        assert_eq!(assets.total_projects(), 15);
        assert_eq!(assets.find_project("1").unwrap().country_name, "Nigeria");
        assert!(assets.find_project("7").is_none());
    }

    #[test]
    fn test_missing_site_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "projects.json", PROJECTS);
        let assets = Assets::load(dir.path()).unwrap();
        assert_eq!(assets.site, SiteConfig::default());
    }

    #[test]
    fn test_missing_projects_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Assets::load(dir.path()).err().unwrap();
        assert!(err.contains("projects.json"));
    }

    #[test]
    fn test_invalid_record_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "projects.json",
            r#"{"x": {"country_coords": {"latitude": 120.0, "longitude": 0.0}, "project_count": 1, "country_name": "Nowhere"}}"#,
        );
        let err = Assets::load(dir.path()).err().unwrap();
        assert!(err.contains("Invalid project record 'x'"));
    }

    #[test]
    fn test_styles_json_is_map_style_array() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "projects.json", "{}");
        let assets = Assets::load(dir.path()).unwrap();
        let json: serde_json::Value = serde_json::from_str(&assets.styles_json().unwrap()).unwrap();
        assert!(json.as_array().unwrap().len() > 1);
        assert_eq!(json[0]["featureType"], "all");
    }
}
