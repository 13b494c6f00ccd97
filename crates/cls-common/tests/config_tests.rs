use super::*;
use std::io::Write;

#[test]
fn test_default_config() {
    let config = ClsConfig::default();
    assert_eq!(config.global_name, "Cls");
    assert_eq!(config.max_call_depth, limits::MAX_CALL_DEPTH);
    assert_eq!(config.max_prototype_depth, limits::MAX_PROTOTYPE_CHAIN_DEPTH);
    assert!(config.validate().is_ok());
}

#[test]
fn test_partial_json_keeps_defaults() {
    let config = ClsConfig::from_json_str(r#"{ "globalName": "Klass" }"#)
        .expect("config should parse in test");

    assert_eq!(config.global_name, "Klass");
    assert_eq!(config.max_call_depth, limits::MAX_CALL_DEPTH);
}

#[test]
fn test_serialized_config_reloads() {
    let config = ClsConfig {
        global_name: "Klass".to_string(),
        max_call_depth: 64,
        max_prototype_depth: 12,
    };
    let text = serde_json::to_string(&config).expect("config should serialize in test");

    assert!(text.contains("\"globalName\":\"Klass\""));
    assert!(text.contains("\"maxCallDepth\":64"));
    assert_eq!(ClsConfig::from_json_str(&text).expect("reload"), config);
}

#[test]
fn test_empty_object_is_default() {
    let config = ClsConfig::from_json_str("{}").expect("config should parse in test");
    assert_eq!(config, ClsConfig::default());
}

#[test]
fn test_unknown_field_rejected() {
    let err = ClsConfig::from_json_str(r#"{ "globalNmae": "Cls" }"#)
        .expect_err("typo should be rejected");
    assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
}

#[test]
fn test_invalid_values_rejected() {
    let err = ClsConfig::from_json_str(r#"{ "globalName": "" }"#)
        .expect_err("empty name should be rejected");
    assert!(matches!(
        err,
        ConfigError::Invalid {
            field: "globalName",
            ..
        }
    ));

    let err = ClsConfig::from_json_str(r#"{ "maxCallDepth": 0 }"#)
        .expect_err("zero depth should be rejected");
    assert!(err.to_string().contains("maxCallDepth"), "{err}");
}

#[test]
fn test_from_path() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file in test");
    write!(file, r#"{{ "maxPrototypeDepth": 32, "maxCallDepth": 16 }}"#)
        .expect("write temp file in test");

    let config = ClsConfig::from_path(file.path()).expect("config should load in test");
    assert_eq!(config.max_prototype_depth, 32);
    assert_eq!(config.max_call_depth, 16);
    assert_eq!(config.global_name, "Cls");
}

#[test]
fn test_missing_file_reports_path() {
    let dir = tempfile::tempdir().expect("temp dir in test");
    let missing = dir.path().join("cls.json");

    let err = ClsConfig::from_path(&missing).expect_err("missing file should fail");
    match err {
        ConfigError::Io { path, .. } => assert_eq!(path, missing),
        other => panic!("expected Io error, got {other:?}"),
    }
}
