use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_ASSETS_DIR: &str = "assets";
pub const DEFAULT_DIST_DIR: &str = "dist";
pub const DEFAULT_LOG_FILTER: &str = "info";

pub fn port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|value| value.trim().parse::<u16>().ok())
        .filter(|value| *value > 0)
        .unwrap_or(DEFAULT_PORT)
}

/// Directory holding `projects.json`, `site.json` and the static images.
pub fn assets_dir() -> PathBuf {
    dir_var("ASSETS_DIR", DEFAULT_ASSETS_DIR)
}

/// Directory holding the built front-end bundle.
pub fn dist_dir() -> PathBuf {
    dir_var("DIST_DIR", DEFAULT_DIST_DIR)
}

fn dir_var(name: &str, default: &str) -> PathBuf {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(default))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_defaults_when_unset() {
        temp_env::with_var_unset("PORT", || {
            assert_eq!(port(), DEFAULT_PORT);
        });
    }

    #[test]
    fn test_port_reads_env() {
        temp_env::with_var("PORT", Some("8088"), || {
            assert_eq!(port(), 8088);
        });
    }

    #[test]
    fn test_port_ignores_garbage_and_zero() {
        temp_env::with_var("PORT", Some("not-a-port"), || {
            assert_eq!(port(), DEFAULT_PORT);
        });
        temp_env::with_var("PORT", Some("0"), || {
            assert_eq!(port(), DEFAULT_PORT);
        });
    }

    #[test]
    fn test_assets_dir_reads_env() {
        temp_env::with_var("ASSETS_DIR", Some("/srv/project-map/assets"), || {
            assert_eq!(assets_dir(), PathBuf::from("/srv/project-map/assets"));
        });
    }

    #[test]
    fn test_blank_dir_falls_back_to_default() {
        temp_env::with_var("DIST_DIR", Some("   "), || {
            assert_eq!(dist_dir(), PathBuf::from(DEFAULT_DIST_DIR));
        });
    }
}
