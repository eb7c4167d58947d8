// SPDX-FileCopyrightText: 2026 Arpent Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Integration tests for the Arpent configuration system.

use arpent_config::diagnostic::ConfigError;
use arpent_config::model::ArpentConfig;
use arpent_config::{load_and_validate_str, load_config_from_str};

/// Valid TOML with all known fields deserializes successfully.
#[test]
fn valid_toml_deserializes_into_arpent_config() {
    let toml = r#"
[general]
log_level = "debug"

[assistant]
endpoint = "https://abc.supabase.co/functions/v1/assistant"
api_key = "anon-key"
bearer_token = "user-jwt"
timeout_secs = 45

[directory]
base_url = "https://abc.supabase.co"
api_key = "anon-key"
table = "equipe"
cache_ttl_secs = 30
"#;

    let config = load_config_from_str(toml).expect("valid TOML should deserialize");
    assert_eq!(config.general.log_level, "debug");
    assert_eq!(
        config.assistant.endpoint.as_deref(),
        Some("https://abc.supabase.co/functions/v1/assistant")
    );
    assert_eq!(config.assistant.effective_bearer(), Some("user-jwt"));
    assert_eq!(config.assistant.timeout_secs, Some(45));
    assert_eq!(config.directory.base_url.as_deref(), Some("https://abc.supabase.co"));
    assert_eq!(config.directory.table, "equipe");
    assert_eq!(config.directory.cache_ttl_secs, 30);
}

/// Missing optional sections use defaults without error.
#[test]
fn missing_optional_sections_use_defaults() {
    let config = load_config_from_str("").expect("empty TOML should use defaults");

    assert_eq!(config.general.log_level, "info");
    assert!(config.assistant.endpoint.is_none());
    assert!(config.assistant.api_key.is_none());
    assert!(config.assistant.timeout_secs.is_none());
    assert!(config.directory.base_url.is_none());
    assert_eq!(config.directory.table, "team_members");
    assert_eq!(config.directory.cache_ttl_secs, 60);
}

/// Unknown field in [assistant] is rejected.
#[test]
fn unknown_field_in_assistant_produces_error() {
    let toml = r#"
[assistant]
endpont = "https://x"
"#;

    let err = load_config_from_str(toml).expect_err("should reject unknown field");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("endpont"),
        "error should mention unknown field or the bad key, got: {err_str}"
    );
}

/// Unexpected top-level section is rejected by deny_unknown_fields.
#[test]
fn deny_unknown_fields_at_top_level() {
    let toml = r#"
[database]
url = "postgres://"
"#;

    let err = load_config_from_str(toml).expect_err("unknown top-level section should be rejected");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("unknown field") || err_str.contains("database"),
        "error should mention unknown field, got: {err_str}"
    );
}

/// Dot-notation overrides behave like `ARPENT_*` env vars.
#[test]
fn dotted_override_sets_nested_value() {
    use figment::{Figment, providers::Serialized};

    let config: ArpentConfig = Figment::new()
        .merge(Serialized::defaults(ArpentConfig::default()))
        .merge(("directory.cache_ttl_secs", 5))
        .extract()
        .expect("should set ttl via dot notation");

    assert_eq!(config.directory.cache_ttl_secs, 5);
}

/// Unknown key produces a diagnostic with a suggestion and the valid keys.
#[test]
fn diagnostic_error_includes_unknown_key_and_suggestion() {
    let toml = r#"
[directory]
cache_tll_secs = 10
"#;

    let errors = load_and_validate_str(toml).expect_err("should produce errors");
    let has_unknown_key = errors.iter().any(|e| {
        matches!(e, ConfigError::UnknownKey { key, suggestion, valid_keys, .. } if {
            key == "cache_tll_secs"
                && suggestion.as_deref() == Some("cache_ttl_secs")
                && valid_keys.contains("table")
        })
    });
    assert!(
        has_unknown_key,
        "should have UnknownKey error with suggestion, got: {errors:?}"
    );
}

/// Invalid type (string where number expected) produces a clear message.
#[test]
fn diagnostic_invalid_type_message() {
    let toml = r#"
[directory]
cache_ttl_secs = "soixante"
"#;

    let err = load_config_from_str(toml).expect_err("should reject invalid type");
    let err_str = format!("{err}");
    assert!(
        err_str.contains("invalid type") || err_str.contains("cache_ttl_secs"),
        "error should mention type mismatch, got: {err_str}"
    );
}

/// Semantic validation runs after a successful parse.
#[test]
fn validation_errors_surface_through_load_and_validate() {
    let toml = r#"
[assistant]
endpoint = "gateway.local/chat"
"#;

    let errors = load_and_validate_str(toml).expect_err("bad endpoint should fail");
    assert!(errors.iter().any(
        |e| matches!(e, ConfigError::Validation { message } if message.contains("assistant.endpoint"))
    ));
}

/// ConfigError renders through miette's graphical handler.
#[test]
fn config_error_renders_with_miette() {
    use miette::{Diagnostic, GraphicalReportHandler};

    let error = ConfigError::UnknownKey {
        key: "endpont".to_string(),
        suggestion: Some("endpoint".to_string()),
        valid_keys: "endpoint, api_key, bearer_token, timeout_secs".to_string(),
        span: None,
        src: None,
    };

    assert!(error.code().is_some());
    let help = error.help().expect("should have help").to_string();
    assert!(help.contains("did you mean `endpoint`"), "got: {help}");

    let mut buf = String::new();
    GraphicalReportHandler::new()
        .render_report(&mut buf, &error)
        .expect("should render without error");
    assert!(buf.contains("endpont"));
}
