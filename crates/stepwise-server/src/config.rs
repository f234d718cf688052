//! Layered configuration loading using figment.
//!
//! Sources in priority order, highest wins:
//! 1. Environment variables (`STEPWISE_*` prefix, `__` as separator)
//! 2. The TOML file given with `--config`, or `stepwise.toml` if present
//! 3. Built-in defaults
//!
//! `STEPWISE_SERVER__BIND` maps to `server.bind`,
//! `STEPWISE_SIMPLIFY__NODE_LIMIT` to `simplify.node_limit`.

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use stepwise::SimplifierConfig;

use crate::error::ConfigError;

/// File read when no `--config` is given.
pub const DEFAULT_CONFIG_FILE: &str = "stepwise.toml";

fn default_bind() -> String {
    "0.0.0.0:8000".to_string()
}

const fn default_max_body_bytes() -> usize {
    64 * 1024
}

/// Service configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct StepwiseConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Limits for the simplifier.
    #[serde(default)]
    pub simplify: SimplifierConfig,
}

/// HTTP listener settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Address to listen on.
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Largest accepted request body.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl StepwiseConfig {
    /// Loads configuration from all sources.
    ///
    /// An explicitly named file must exist; the default file is optional.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the named file is missing or a value has
    /// the wrong type.
    pub fn load(file: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = file {
            if !path.exists() {
                return Err(ConfigError::MissingFile(path.to_path_buf()));
            }
        }
        let config: Self = Self::figment(file).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Builds the provider chain.
    pub fn figment(file: Option<&Path>) -> Figment {
        let path = file.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), Path::to_path_buf);
        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed("STEPWISE_").split("__"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.max_body_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_body_bytes".to_string(),
                reason: "must be positive".to_string(),
            });
        }
        if self.simplify.iter_limit == 0 || self.simplify.node_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "simplify".to_string(),
                reason: "iteration and node limits must be positive".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        Jail::expect_with(|_jail| {
            let config = StepwiseConfig::load(None).expect("defaults load");
            assert_eq!(config, StepwiseConfig::default());
            assert_eq!(config.server.bind, "0.0.0.0:8000");
            assert_eq!(config.server.max_body_bytes, 65536);
            assert_eq!(config.simplify.iter_limit, 10);
            Ok(())
        });
    }

    #[test]
    fn test_default_file_is_read() {
        Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_CONFIG_FILE,
                r#"
                [server]
                bind = "127.0.0.1:9000"

                [simplify]
                node_limit = 500
                "#,
            )?;
            let config = StepwiseConfig::load(None).expect("file loads");
            assert_eq!(config.server.bind, "127.0.0.1:9000");
            assert_eq!(config.server.max_body_bytes, 65536);
            assert_eq!(config.simplify.node_limit, 500);
            assert_eq!(config.simplify.time_limit_ms, 500);
            Ok(())
        });
    }

    #[test]
    fn test_env_beats_file() {
        Jail::expect_with(|jail| {
            jail.create_file("custom.toml", "[server]\nmax_body_bytes = 10\n")?;
            jail.set_env("STEPWISE_SERVER__MAX_BODY_BYTES", "20");
            jail.set_env("STEPWISE_LOG", "debug");
            let config = StepwiseConfig::load(Some(Path::new("custom.toml"))).expect("config loads");
            assert_eq!(config.server.max_body_bytes, 20);
            Ok(())
        });
    }

    #[test]
    fn test_named_file_must_exist() {
        Jail::expect_with(|_jail| {
            let result = StepwiseConfig::load(Some(Path::new("missing.toml")));
            assert!(matches!(result, Err(ConfigError::MissingFile(_))));
            Ok(())
        });
    }

    #[test]
    fn test_invalid_values() {
        Jail::expect_with(|jail| {
            jail.set_env("STEPWISE_SERVER__MAX_BODY_BYTES", "0");
            let result = StepwiseConfig::load(None);
            assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));

            jail.set_env("STEPWISE_SERVER__MAX_BODY_BYTES", "many");
            let result = StepwiseConfig::load(None);
            assert!(matches!(result, Err(ConfigError::Figment(_))));
            Ok(())
        });
    }
}
