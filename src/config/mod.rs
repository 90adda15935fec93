mod types;

pub use types::*;

use anyhow::{Context, Result};
use std::path::Path;

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    // Try default locations
    let default_paths = [
        "./config.toml",
        "./clipcheck.toml",
        "/etc/clipcheck/config.toml",
    ];

    for path_str in default_paths {
        let path = Path::new(path_str);
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
fn validate_config(config: &Config) -> Result<()> {
    if config.server.port == 0 {
        anyhow::bail!("Server port cannot be 0");
    }

    if config.storage.max_upload_mb == 0 {
        anyhow::bail!("storage.max_upload_mb cannot be 0");
    }

    if config.analysis.num_frames == 0 {
        tracing::warn!("analysis.num_frames is 0; no thumbnails will be extracted");
    }

    if let Some(ref static_dir) = config.server.static_dir {
        if !static_dir.exists() {
            tracing::warn!("Static dir does not exist: {:?}", static_dir);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.storage.max_upload_mb, 100);
        assert_eq!(config.analysis.num_frames, 6);
    }

    #[test]
    fn parse_partial_config() {
        let config: Config = toml::from_str(
            r#"
            [server]
            port = 9000

            [storage]
            max_upload_mb = 10
            "#,
        )
        .unwrap();
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.storage.max_upload_mb, 10);
        // Untouched sections keep their defaults.
        assert_eq!(config.analysis.probe_timeout_secs, 30);
    }

    #[test]
    fn zero_port_rejected() {
        let mut config = Config::default();
        config.server.port = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn zero_cap_rejected() {
        let mut config = Config::default();
        config.storage.max_upload_mb = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn load_missing_file_fails() {
        assert!(load_config(Path::new("/nonexistent/clipcheck.toml")).is_err());
    }
}
