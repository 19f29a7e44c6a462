use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "UNIBENCH_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.dataset_path, PathBuf::from("./config/dataset.yaml"));
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
    assert_eq!(cfg.compare_capacity, 4);
}

#[test]
fn build_app_config_applies_overrides() {
    let mut map = HashMap::new();
    map.insert("UNIBENCH_ENV", "production");
    map.insert("UNIBENCH_DATASET_PATH", "/srv/unibench/dataset.yaml");
    map.insert("UNIBENCH_LOG_LEVEL", "debug");
    map.insert("UNIBENCH_BIND_ADDR", "127.0.0.1:8080");
    map.insert("UNIBENCH_COMPARE_CAPACITY", "6");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Production);
    assert_eq!(
        cfg.dataset_path,
        PathBuf::from("/srv/unibench/dataset.yaml")
    );
    assert_eq!(cfg.log_level, "debug");
    assert_eq!(cfg.bind_addr.to_string(), "127.0.0.1:8080");
    assert_eq!(cfg.compare_capacity, 6);
}

#[test]
fn build_app_config_fails_with_invalid_bind_addr() {
    let mut map = HashMap::new();
    map.insert("UNIBENCH_BIND_ADDR", "not-a-socket-addr");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "UNIBENCH_BIND_ADDR"),
        "expected InvalidEnvVar(UNIBENCH_BIND_ADDR), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_zero_compare_capacity() {
    let mut map = HashMap::new();
    map.insert("UNIBENCH_COMPARE_CAPACITY", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "UNIBENCH_COMPARE_CAPACITY"),
        "expected InvalidEnvVar(UNIBENCH_COMPARE_CAPACITY), got: {result:?}"
    );
}

#[test]
fn build_app_config_fails_with_non_numeric_compare_capacity() {
    let mut map = HashMap::new();
    map.insert("UNIBENCH_COMPARE_CAPACITY", "four");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn environment_display() {
    assert_eq!(Environment::Development.to_string(), "development");
    assert_eq!(Environment::Production.to_string(), "production");
}
