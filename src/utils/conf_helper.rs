use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::info;

use crate::core::error::{ForceFileError, Result};
use crate::models::config_model::AnalysisConfig;

static CONFIG_CACHE: OnceLock<AnalysisConfig> = OnceLock::new();

/// Reads and validates an analysis config from a JSON file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AnalysisConfig> {
    let path = path.as_ref();
    let data = fs::read_to_string(path)?;
    parse_config(&data)
}

pub fn parse_config(data: &str) -> Result<AnalysisConfig> {
    let config: AnalysisConfig = serde_json::from_str(data)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &AnalysisConfig) -> Result<()> {
    if !config.step_threshold.is_finite() || !(0.0..=1.0).contains(&config.step_threshold) {
        return Err(ForceFileError::Config(format!(
            "step_threshold must be within [0, 1], got {}",
            config.step_threshold
        )));
    }
    if config.segment_suffixes.iter().any(String::is_empty) {
        return Err(ForceFileError::Config(
            "segment_suffixes must not contain empty strings".to_string(),
        ));
    }
    Ok(())
}

/// Loads the config once for the whole process.
pub fn init_config<P: AsRef<Path>>(path: P) -> Result<&'static AnalysisConfig> {
    let config = load_config(&path)?;

    CONFIG_CACHE
        .set(config)
        .map_err(|_| ForceFileError::Config("Config already initialized".to_string()))?;

    info!("Config initialized from {}", path.as_ref().display());
    Ok(get_cached_config())
}

/// The process-wide config, or defaults if `init_config` was never called.
pub fn get_cached_config() -> &'static AnalysisConfig {
    CONFIG_CACHE.get_or_init(AnalysisConfig::default)
}
