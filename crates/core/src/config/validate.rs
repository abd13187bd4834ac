use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Server port is not 0
/// - Storage path, when given, is not empty
/// - Resolver timeout is positive and its base URL is http(s)
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::ValidationError(
            "server.port cannot be 0".to_string(),
        ));
    }

    if let Some(path) = &config.storage.path {
        if path.as_os_str().is_empty() {
            return Err(ConfigError::ValidationError(
                "storage.path cannot be empty".to_string(),
            ));
        }
    }

    if config.resolver.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "resolver.timeout_secs must be greater than 0".to_string(),
        ));
    }

    let base_url = config.resolver.base_url();
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError(format!(
            "resolver.base_url must be an http(s) URL, got {:?}",
            base_url
        )));
    }

    Ok(())
}
