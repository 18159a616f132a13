use super::*;

#[test]
fn test_empty_document_gives_defaults() {
    let config = EngineConfig::from_toml_str("").unwrap();
    assert_eq!(config, EngineConfig::default());
    assert_eq!(config.search.max_depth, 64);
    assert_eq!(config.search.check_interval, 1024);
    assert_eq!(config.time.next_depth_factor, 2.0);
}

#[test]
fn test_partial_tables_keep_other_defaults() {
    let text = r#"
        [search]
        max_depth = 6

        [eval]
        mobility = 0
    "#;
    let config = EngineConfig::from_toml_str(text).unwrap();
    assert_eq!(config.search.max_depth, 6);
    assert_eq!(config.search.quiescence_depth, 8);
    assert_eq!(config.eval.mobility, 0);
    assert_eq!(config.eval.material, 1);
    assert_eq!(config.time, TimeConfig::default());
}

#[test]
fn test_recursion_bound_is_clamped() {
    let text = "[search]\nmax_depth = 200\nquiescence_depth = 50\ncheck_interval = 0";
    let config = EngineConfig::from_toml_str(text).unwrap();
    assert_eq!(config.search.max_depth, 127);
    assert_eq!(config.search.quiescence_depth, 0);
    assert_eq!(config.search.check_interval, 1);

    let config = EngineConfig::default().with_max_depth(0);
    assert_eq!(config.search.max_depth, 1);
}

#[test]
fn test_bad_toml_is_a_parse_error() {
    assert!(matches!(
        EngineConfig::from_toml_str("[search]\nmax_depth = \"deep\""),
        Err(ConfigError::Parse(_))
    ));
    assert!(matches!(
        EngineConfig::from_toml_str("[search"),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_missing_file_is_an_io_error() {
    let err = EngineConfig::load("/definitely/not/here/engine.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("engine.toml"));
}

#[test]
fn test_serialized_config_reads_back() {
    let mut config = EngineConfig::default();
    config.eval.passed_pawn = 20;
    config.search.tt_entries = 1024;
    let text = config.to_toml_string().unwrap();
    assert_eq!(EngineConfig::from_toml_str(&text).unwrap(), config);
}
