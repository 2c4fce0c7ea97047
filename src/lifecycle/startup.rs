//! Startup configuration.

use std::path::Path;

use crate::config::{load_config, validate_config, ConfigError, ServiceConfig};

/// Load the configuration the process starts with.
///
/// Without a path the built-in defaults are used. `bind_override` replaces
/// the listener address and is validated like the rest of the file.
pub fn startup_config(
    path: Option<&Path>,
    bind_override: Option<&str>,
) -> Result<ServiceConfig, ConfigError> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(bind) = bind_override {
        config.listener.bind_address = bind.to_string();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = startup_config(None, None).unwrap();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8084");
    }

    #[test]
    fn test_bind_override_is_validated() {
        let config = startup_config(None, Some("127.0.0.1:9999")).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:9999");

        let err = startup_config(None, Some("not-an-address")).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
    }
}
