use std::env;

use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use token_auth::SecurityConfig;

/// Prefix for environment overrides, e.g. `TOKEN_SECURITY__AUDIENCE`.
pub const ENV_PREFIX: &str = "TOKEN";

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub security: SecurityConfig,
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (TOKEN_SECURITY__SIGNING_KEY, TOKEN_SECURITY__AUDIENCE, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            .add_source(environment());

        Self::from_builder(builder)
    }

    /// Build and deserialize an already layered set of sources.
    pub fn from_builder(builder: config::ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let configuration = builder.build()?;
        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}

/// Environment source used by [`Config::load`].
pub fn environment() -> Environment {
    Environment::with_prefix(ENV_PREFIX)
        .prefix_separator("_")
        .separator("__")
}
