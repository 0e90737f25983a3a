//! Integration tests for config load/save.

use pdf_chat_client::{config, Config};
use predicates::prelude::*;

#[test]
fn load_existing_yaml_config() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(
        &config_path,
        r#"
relay:
  port: 8080
  upstream_url: "http://127.0.0.1:8000"
client:
  relay_url: "http://127.0.0.1:8080"
"#,
    )
    .unwrap();

    let result = config::load(&config_path);
    let cfg = result.expect("load should succeed");
    assert_eq!(cfg.relay.port, Some(8080));
    assert_eq!(
        cfg.relay.upstream_url.as_deref(),
        Some("http://127.0.0.1:8000")
    );
    assert_eq!(
        cfg.client.relay_url.as_deref(),
        Some("http://127.0.0.1:8080")
    );
}

#[test]
fn missing_sections_default_to_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    std::fs::write(&config_path, "client:\n  relay_url: \"http://localhost\"\n").unwrap();

    let cfg = config::load(&config_path).expect("load should succeed");
    assert!(cfg.relay.port.is_none());
    assert!(cfg.relay.upstream_url.is_none());
    assert_eq!(cfg.client.relay_url.as_deref(), Some("http://localhost"));
}

#[test]
fn save_creates_directory_and_file_when_missing() {
    let dir = tempfile::tempdir().unwrap();
    let config_dir = dir.path().join("pdf-chat");
    let config_path = config_dir.join("config.yaml");
    assert!(!config_dir.exists(), "config dir should not exist yet");

    let mut config = Config::default();
    config.relay.port = Some(8081);
    config.relay.upstream_url = Some("http://127.0.0.1:9000".into());
    config.client.relay_url = Some("http://127.0.0.1:8081".into());

    let result = config::save(&config_path, &config);
    result.expect("save should succeed");
    let pred = predicates::path::exists();
    assert!(
        pred.eval(&config_path),
        "config file should exist after save"
    );
    assert!(config_dir.exists(), "config directory should be created");
}

#[test]
fn round_trip_preserves_schema() {
    let dir = tempfile::tempdir().unwrap();
    let config_path = dir.path().join("config.yaml");
    let yaml = r#"
relay:
  port: 8080
  upstream_url: "http://backend.internal:8000"
client:
  relay_url: "http://127.0.0.1:8080"
"#;
    std::fs::write(&config_path, yaml).unwrap();

    let loaded = config::load(&config_path).expect("load should succeed");
    config::save(&config_path, &loaded).expect("save should succeed");

    let contents = std::fs::read_to_string(&config_path).unwrap();
    let pred = predicates::str::contains("relay:");
    assert!(
        pred.eval(&contents),
        "saved file should contain relay section"
    );
    let pred = predicates::str::contains("upstream_url");
    assert!(
        pred.eval(&contents),
        "saved file should contain upstream_url"
    );
    let pred = predicates::str::contains("client:");
    assert!(
        pred.eval(&contents),
        "saved file should contain client section"
    );

    let reloaded = config::load(&config_path).expect("reload should succeed");
    assert_eq!(reloaded.relay.port, loaded.relay.port);
    assert_eq!(reloaded.relay.upstream_url, loaded.relay.upstream_url);
    assert_eq!(reloaded.client.relay_url, loaded.client.relay_url);
}

/// Config path resolves to `~/.pdf-chat/config.yaml` using the current
/// platform's home dir. We override the HOME env var to a temp dir to verify
/// the resolution.
#[test]
fn default_config_path_uses_home_directory() {
    let dir = tempfile::tempdir().unwrap();
    let home = dir.path().to_str().unwrap().to_string();

    // Override HOME (Unix) / USERPROFILE (Windows) temporarily.
    let key = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    let original = std::env::var(key).ok();

    std::env::set_var(key, &home);
    let path = config::default_config_path();
    // Restore.
    match original {
        Some(v) => std::env::set_var(key, v),
        None => std::env::remove_var(key),
    }

    let path = path.expect("should resolve a config path");
    let expected = dir.path().join(".pdf-chat").join("config.yaml");
    assert_eq!(path, expected);
}
