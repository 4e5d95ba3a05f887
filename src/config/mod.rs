//! Configuration management

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub provider: ProviderConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Identifier of the telephony provider owning new sessions
    pub provider_id: String,
    /// Line id used by the demo binary
    pub default_line_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    pub level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig {
                provider_id: "provider-demo".to_string(),
                default_line_id: "+15551234567".to_string(),
            },
            log: LogConfig {
                level: "info".to_string(),
            },
        }
    }
}

impl Config {
    /// Load configuration from an optional `voxline.toml` with `VOXLINE_*`
    /// environment overrides (e.g. `VOXLINE_LOG__LEVEL=debug`).
    pub fn load() -> Result<Self, config::ConfigError> {
        let defaults = Config::default();

        config::Config::builder()
            .set_default("provider.provider_id", defaults.provider.provider_id)?
            .set_default("provider.default_line_id", defaults.provider.default_line_id)?
            .set_default("log.level", defaults.log.level)?
            .add_source(config::File::with_name("voxline").required(false))
            .add_source(config::Environment::with_prefix("VOXLINE").separator("__"))
            .build()?
            .try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.provider.provider_id, "provider-demo");
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_load_falls_back_to_defaults() {
        let config = Config::load().expect("defaults load without a file");
        assert_eq!(config.provider.provider_id, "provider-demo");
    }
}
