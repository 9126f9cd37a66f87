//! Configuration loading from disk and the environment.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::str::FromStr;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Env { var: &'static str, value: String },
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Env { var, value } => {
                write!(f, "Invalid value for {}: '{}'", var, value)
            }
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration: optional TOML file, then environment overrides, then validation.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay the deployment environment variables onto `config`.
///
/// `lookup` returns the raw value of a variable, if set.
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(port) = parse_var::<u16, _>(&lookup, "APP_PORT")? {
        config.server.bind_address = replace_port(&config.server.bind_address, port);
    }

    if let Some(host) = lookup("OBS_HOST") {
        config.obs.host = host;
    }
    if let Some(port) = parse_var(&lookup, "OBS_PORT")? {
        config.obs.port = port;
    }
    if let Some(password) = lookup("OBS_PASSWORD") {
        config.obs.password = password;
    }
    if let Some(timeout) = parse_var(&lookup, "OBS_TIMEOUT")? {
        config.obs.timeout_secs = timeout;
    }

    if let Some(scene) = lookup("BRB_SCENE") {
        config.scenes.brb = scene;
    }
    if let Some(scene) = lookup("MAIN_SCENE") {
        config.scenes.main = scene;
    }
    if let Some(source) = lookup("CAMERA_SOURCE_NAME") {
        config.monitor.source_name = source;
    }
    if let Some(threshold) = parse_var(&lookup, "BITRATE_THRESHOLD")? {
        config.monitor.bitrate_threshold_kbps = threshold;
    }

    if let Some(level) = lookup("LOG_LEVEL") {
        config.observability.log_level = level;
    }

    Ok(())
}

/// Swap the port of `host:port`, keeping the host as written.
fn replace_port(bind_address: &str, port: u16) -> String {
    if let Ok(mut addr) = bind_address.parse::<SocketAddr>() {
        addr.set_port(port);
        return addr.to_string();
    }
    let host = bind_address
        .rsplit_once(':')
        .map_or(bind_address, |(host, _)| host)
        .trim();
    if host.is_empty() {
        format!("0.0.0.0:{}", port)
    } else {
        format!("{}:{}", host, port)
    }
}

fn parse_var<T, F>(lookup: &F, var: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Env { var, value }),
        None => Ok(None),
    }
}
