use super::*;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.pipeline.input_queue_capacity, 100);
    assert_eq!(config.pipeline.output_queue_capacity, 100);
    assert_eq!(config.pipeline.worker_count, 10);
    assert_eq!(config.pipeline.delimiter, ';');
    assert_eq!(config.directories.reference_files.len(), 4);
    assert_eq!(config.output.dir, PathBuf::from("processed"));
    assert_eq!(config.triggers.minute_flush_ms, 60_000);
    assert_eq!(config.rpc.port, 50051);
    assert!(config.rpc.enabled);
    assert!(config.validate().is_ok());
}

#[test]
fn test_deserialize_empty() {
    let config = Config::from_str("").unwrap();
    assert_eq!(config.pipeline.worker_count, 10);
    assert_eq!(config.ingest.log_header, "timestamp;type;content;extra_1;extra_2");
}

#[test]
fn test_deserialize_partial() {
    let toml = r#"
[pipeline]
worker_count = 4
delimiter = ","

[triggers]
minute_flush_ms = 5000
"#;
    let config = Config::from_str(toml).unwrap();
    assert_eq!(config.pipeline.worker_count, 4);
    assert_eq!(config.pipeline.delimiter, ',');
    assert_eq!(config.triggers.minute_flush_ms, 5_000);
    // Defaults still apply
    assert_eq!(config.pipeline.input_queue_capacity, 100);
    assert_eq!(config.triggers.hour_flush_ms, 3_600_000);
}

#[test]
fn test_deserialize_directories() {
    let toml = r#"
[directories]
reference = "/data/csv"
log = "/data/log"
request = "/data/request"
reference_files = ["products.csv"]
"#;
    let config = Config::from_str(toml).unwrap();
    assert_eq!(config.directories.reference, PathBuf::from("/data/csv"));
    assert_eq!(config.directories.reference_files, vec!["products.csv"]);
}

#[test]
fn test_validation_rejects_zero_capacities() {
    let config = Config::from_str("[pipeline]\ninput_queue_capacity = 0").unwrap();
    assert!(config.validate().is_err());

    let config = Config::from_str("[pipeline]\nworker_count = 0").unwrap();
    assert!(config.validate().is_err());
}

#[test]
fn test_validation_rejects_inverted_request_interval() {
    let toml = r#"
[triggers]
request_min_ms = 5000
request_max_ms = 1000
"#;
    let config = Config::from_str(toml).unwrap();
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Validation(_))
    ));
}

#[test]
fn test_invalid_toml_is_parse_error() {
    assert!(matches!(
        Config::from_str("not toml at all ["),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_rpc_bind_address() {
    let config = Config::from_str("[rpc]\naddress = \"127.0.0.1\"\nport = 9000").unwrap();
    assert_eq!(config.rpc.bind_address(), "127.0.0.1:9000");
}
