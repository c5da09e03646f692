use std::collections::HashMap;

use super::*;

fn config_from(vars: &[(&str, &str)]) -> Result<ServerConfig, ConfigError> {
    let vars = vars
        .iter()
        .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
        .collect::<HashMap<_, _>>();
    ServerConfig::from_lookup(|key| vars.get(key).cloned())
}

#[test]
fn defaults_when_nothing_is_set() {
    let cfg = config_from(&[]).unwrap();
    assert_eq!(cfg.port, DEFAULT_PORT);
    assert_eq!(cfg.page_size, DEFAULT_PAGE_SIZE);
    assert_eq!(cfg.db_max_connections, DEFAULT_DB_MAX_CONNECTIONS);
    assert!(cfg.database_url.is_none());
    assert!(cfg.seed_path.is_none());
    assert!(cfg.token.is_none());
}

#[test]
fn parses_overrides() {
    let cfg = config_from(&[
        ("PORT", "8080"),
        ("DATABASE_URL", "postgres://localhost/logs"),
        ("LOGS_SEED_PATH", "/tmp/logs.jsonl"),
        ("LOGS_PAGE_SIZE", " 25 "),
        ("LOG_REVIEW_TOKEN", "s3cret"),
        ("DB_MAX_CONNECTIONS", "12"),
    ])
    .unwrap();
    assert_eq!(cfg.port, 8080);
    assert_eq!(cfg.database_url.as_deref(), Some("postgres://localhost/logs"));
    assert_eq!(cfg.seed_path, Some(PathBuf::from("/tmp/logs.jsonl")));
    assert_eq!(cfg.page_size, 25);
    assert_eq!(cfg.token.as_deref(), Some("s3cret"));
    assert_eq!(cfg.db_max_connections, 12);
}

#[test]
fn blank_optional_values_count_as_unset() {
    let cfg = config_from(&[("DATABASE_URL", ""), ("LOG_REVIEW_TOKEN", "  ")]).unwrap();
    assert!(cfg.database_url.is_none());
    assert!(cfg.token.is_none());
}

#[test]
fn rejects_malformed_numbers() {
    assert_eq!(
        config_from(&[("PORT", "eighty")]),
        Err(ConfigError::Invalid { var: "PORT", value: "eighty".into() })
    );
    assert!(config_from(&[("LOGS_PAGE_SIZE", "0")]).is_err());
}
