mod types;

pub use types::*;

use crate::Result;
use std::env;
use tracing::debug;

pub async fn load() -> Result<Config> {
    let config_path = env::var("CONFIG_PATH").unwrap_or_else(|_| "config.yaml".to_string());

    let mut config = match tokio::fs::read_to_string(&config_path).await {
        Ok(config_str) => {
            debug!("Loading configuration from: {}", config_path);
            parse(&config_str)?
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("No configuration file at {}, using defaults", config_path);
            Config::default()
        }
        Err(e) => return Err(e.into()),
    };

    apply_env_overrides(&mut config, |key| env::var(key).ok());

    Ok(config)
}

pub fn parse(config_str: &str) -> Result<Config> {
    // An empty file deserializes to `null`, not to an empty mapping.
    if config_str.trim().is_empty() {
        return Ok(Config::default());
    }
    Ok(serde_yaml::from_str(config_str)?)
}

/// Environment variables take precedence over the file.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(path) = lookup("MODEL_PATH") {
        config.model.path = path.clone();
        config.registry.download_dir = path;
    }
    if let Some(api_key) = lookup("WANDB_API_KEY") {
        config.registry.api_key = Some(api_key);
    }
    if let Some(model_name) = lookup("MODEL_NAME") {
        config.registry.model_name = Some(model_name);
    }
    if let Some(version) = lookup("VERSION") {
        config.registry.version = Some(version);
    }
    if let Some(base_url) = lookup("API_BASE_URL") {
        config.frontend.api_base_url = base_url;
    }
}
