use config::File;
use config::FileFormat;
use token_service::config::Config;

pub const SETTINGS: &str = r#"
[security]
algorithm = "HS256"
signing_key = "test-secret-key-for-jwt-signing-at-least-32-bytes"
audience = "aud1"
issuer = "iss1"
lifetime_hours = 2400
"#;

/// Load configuration from an inline TOML document plus optional environment overrides.
pub fn load(toml: &str, env: &[(&str, &str)]) -> Result<Config, config::ConfigError> {
    let overrides = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    Config::from_builder(
        config::Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .add_source(token_service::config::environment().source(Some(overrides))),
    )
}

pub fn test_config() -> Config {
    load(SETTINGS, &[]).expect("Failed to load test configuration")
}
