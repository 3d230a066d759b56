use std::path::Path;

use anyhow::Context;
use qaoa_landscape::LandscapeConfig;

const DEFAULT_PATHS: [&str; 2] = ["qaoa-landscape.json", "config/qaoa-landscape.json"];

/// Load the configuration from `path`, else from the first default location
/// that exists, else the built-in defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<LandscapeConfig> {
    let config = match path {
        Some(p) => read(p)?,
        None => match DEFAULT_PATHS.iter().map(Path::new).find(|p| p.is_file()) {
            Some(p) => read(p)?,
            None => LandscapeConfig::default(),
        },
    };
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn read(path: &Path) -> anyhow::Result<LandscapeConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    let config = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse config {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded configuration");
    Ok(config)
}
