use std::path::Path;

use config::{Config, Environment, File, FileFormat};
use eyre::{Context, Result};
use thiserror::Error;

use crate::config::models::AppConfig;

/// Environment variable prefix, e.g. `GEOGATE_LISTEN_PORT`,
/// `GEOGATE_GEOCODER__API_KEY`.
const ENV_PREFIX: &str = "GEOGATE";

/// Validation failures for a loaded configuration.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("geocoder.api_key is required (set {ENV_PREFIX}_GEOCODER__API_KEY)")]
    MissingApiKey,

    #[error("geocoder.endpoint is not a valid URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    #[error("listen_port must be non-zero")]
    InvalidPort,
}

/// Load configuration by layering sources: built-in defaults, then an
/// optional file (YAML / JSON / TOML, chosen by extension), then
/// `GEOGATE`-prefixed environment variables. Later sources win.
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder().add_source(
        Config::try_from(&AppConfig::default()).context("Failed to serialize default config")?,
    );

    if let Some(path) = config_path {
        builder = builder.add_source(File::new(path, detect_format(path)));
    }

    let settings = builder
        .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()
        .context("Failed to build configuration")?;

    let app_config: AppConfig = settings
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    validate(&app_config)?;
    Ok(app_config)
}

/// Determine file format based on extension
fn detect_format(config_path: &str) -> FileFormat {
    match Path::new(config_path).extension().and_then(|ext| ext.to_str()) {
        Some("yaml") | Some("yml") => FileFormat::Yaml,
        Some("json") => FileFormat::Json,
        Some("ini") => FileFormat::Ini,
        _ => FileFormat::Toml,
    }
}

fn validate(config: &AppConfig) -> Result<(), ValidationError> {
    if config.geocoder.api_key.trim().is_empty() {
        return Err(ValidationError::MissingApiKey);
    }
    url::Url::parse(&config.geocoder.endpoint)?;
    if config.listen_port == 0 {
        return Err(ValidationError::InvalidPort);
    }
    Ok(())
}
