//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Path of the TOML config file. Defaults are used when unset.
pub const CONFIG_PATH_ENV: &str = "CEP_WEATHER_CONFIG";
pub const API_KEY_ENV: &str = "WEATHER_API_KEY";
pub const ZIPKIN_ENDPOINT_ENV: &str = "ZIPKIN_ENDPOINT";
pub const BIND_ADDRESS_ENV: &str = "CEP_WEATHER_BIND";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServiceConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Build configuration from the process environment.
///
/// Reads the file named by `CEP_WEATHER_CONFIG` (if any), applies environment
/// overrides, then validates the result.
pub fn load_from_env() -> Result<ServiceConfig, ConfigError> {
    let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
        Some(path) => {
            let content = fs::read_to_string(&path)?;
            toml::from_str(&content)?
        }
        None => ServiceConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Override secrets and deployment-specific values from the environment.
pub fn apply_env_overrides<F>(config: &mut ServiceConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_empty(API_KEY_ENV) {
        config.upstreams.weather.api_key = key;
    }
    if let Some(endpoint) = non_empty(ZIPKIN_ENDPOINT_ENV) {
        config.observability.zipkin_endpoint = Some(endpoint);
    }
    if let Some(bind) = non_empty(BIND_ADDRESS_ENV) {
        config.listener.bind_address = bind;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (API_KEY_ENV, "from-env"),
            (ZIPKIN_ENDPOINT_ENV, "http://zipkin:9411/api/v2/spans"),
            (BIND_ADDRESS_ENV, " "),
        ]);
        let mut config = ServiceConfig::default();

        apply_env_overrides(&mut config, |k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.upstreams.weather.api_key, "from-env");
        assert_eq!(
            config.observability.zipkin_endpoint.as_deref(),
            Some("http://zipkin:9411/api/v2/spans")
        );
        // Blank values are ignored.
        assert_eq!(config.listener.bind_address, "0.0.0.0:8081");
    }

    #[test]
    fn test_load_config_from_file() {
        let path = std::env::temp_dir().join(format!("cep-weather-{}.toml", uuid::Uuid::new_v4()));
        let mut file = fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[listener]\nbind_address = \"127.0.0.1:9000\"\n\n\
             [upstreams.weather]\napi_key = \"abc\"\n"
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        fs::remove_file(&path).ok();

        assert_eq!(config.listener.bind_address, "127.0.0.1:9000");
        assert_eq!(config.upstreams.weather.api_key, "abc");
    }

    #[test]
    fn test_load_config_reports_validation_errors() {
        let path = std::env::temp_dir().join(format!("cep-weather-{}.toml", uuid::Uuid::new_v4()));
        fs::write(&path, "[timeouts]\noutbound_ms = 0\n").unwrap();

        let err = load_config(&path).unwrap_err();
        fs::remove_file(&path).ok();

        let msg = err.to_string();
        assert!(msg.starts_with("Validation failed: "));
        assert!(msg.contains("api_key"));
        assert!(msg.contains("timeouts.outbound_ms"));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_config(Path::new("/nonexistent/cep-weather.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
