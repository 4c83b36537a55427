mod common;

use token_auth::SigningAlgorithm;

#[test]
fn test_load_from_toml() {
    let config = common::test_config();

    assert_eq!(config.security.signing_algorithm(), Ok(SigningAlgorithm::HS256));
    assert_eq!(config.security.audience(), Some("aud1"));
    assert_eq!(config.security.issuer(), Some("iss1"));
    assert_eq!(config.security.lifetime_hours, 2400);
}

#[test]
fn test_defaults_apply_to_missing_keys() {
    let config = common::load(
        r#"
[security]
signing_key = "secret"
audience = "aud1"
"#,
        &[],
    )
    .unwrap();

    assert_eq!(config.security.algorithm, "HS256");
    assert_eq!(config.security.lifetime_hours, 2400);
    assert_eq!(config.security.clock_skew_seconds, 0);
    assert!(config.security.issuer.is_none());
}

#[test]
fn test_environment_overrides_file() {
    let config = common::load(
        common::SETTINGS,
        &[
            ("TOKEN_SECURITY__AUDIENCE", "from-env"),
            ("TOKEN_SECURITY__LIFETIME_HOURS", "24"),
        ],
    )
    .unwrap();

    assert_eq!(config.security.audience(), Some("from-env"));
    assert_eq!(config.security.lifetime_hours, 24);
    assert_eq!(config.security.issuer(), Some("iss1"));
}

#[test]
fn test_environment_strings_are_kept_verbatim() {
    for value in [
        "00123456789012345678901234567890",
        "123456789012345678901234567890123",
        "TRUE",
    ] {
        let config = common::load(
            common::SETTINGS,
            &[
                ("TOKEN_SECURITY__SIGNING_KEY", value),
                ("TOKEN_SECURITY__AUDIENCE", value),
                ("TOKEN_SECURITY__ISSUER", value),
            ],
        )
        .unwrap();

        assert_eq!(config.security.signing_key(), Some(value));
        assert_eq!(config.security.audience(), Some(value));
        assert_eq!(config.security.issuer(), Some(value));
    }
}

#[test]
fn test_unprefixed_environment_is_ignored() {
    let config = common::load(common::SETTINGS, &[("SECURITY__AUDIENCE", "ignored")]).unwrap();
    assert_eq!(config.security.audience(), Some("aud1"));
}

#[test]
fn test_missing_security_section() {
    assert!(common::load("", &[]).is_err());
}

#[test]
fn test_debug_output_hides_secret() {
    let debug = format!("{:?}", common::test_config());
    assert!(!debug.contains("test-secret-key"));
}
