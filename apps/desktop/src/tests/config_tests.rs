use super::{load_settings_with, normalize_backend_url, Settings};

use std::{
    collections::HashMap,
    env, fs,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_config(contents: &str) -> PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let root = env::temp_dir().join(format!("evidence_desktop_config_{suffix}"));
    fs::create_dir_all(&root).expect("temp root");
    let path = root.join("desktop.toml");
    fs::write(&path, contents).expect("write config");
    path
}

fn no_env(_: &str) -> Option<String> {
    None
}

#[test]
fn missing_config_file_yields_defaults() {
    let settings =
        load_settings_with(&env::temp_dir().join("does-not-exist.toml"), no_env).expect("load");
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.backend_url, "http://localhost:8000/api/v1");
}

#[test]
fn config_file_then_env_override() {
    let path = temp_config(
        "backend_url = \"http://rag.internal:9000/api/v1/\"\nlog_filter = \"debug\"\n",
    );

    let settings = load_settings_with(&path, no_env).expect("load");
    assert_eq!(settings.backend_url, "http://rag.internal:9000/api/v1");
    assert_eq!(settings.log_filter, "debug");

    let vars = HashMap::from([
        ("BACKEND_URL", "http://ignored:1"),
        ("APP__BACKEND_URL", "https://rag.example.org/api/v1"),
        ("APP__LOG_FILTER", "client_core=trace"),
    ]);
    let settings = load_settings_with(&path, |key| vars.get(key).map(|v| v.to_string()))
        .expect("load");
    assert_eq!(settings.backend_url, "https://rag.example.org/api/v1");
    assert_eq!(settings.log_filter, "client_core=trace");

    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn malformed_config_file_is_an_error() {
    let path = temp_config("backend_url = [1, 2]\n");
    let err = load_settings_with(&path, no_env).expect_err("must fail");
    assert!(err.to_string().contains("failed to parse config file"));
    fs::remove_dir_all(path.parent().expect("parent")).expect("cleanup");
}

#[test]
fn blank_backend_url_falls_back_to_default() {
    assert_eq!(
        normalize_backend_url("   ").expect("normalize"),
        "http://localhost:8000/api/v1"
    );
}

#[test]
fn rejects_non_http_backend_url() {
    let err = normalize_backend_url("ftp://files.example.org/api").expect_err("must fail");
    assert!(err.to_string().contains("must use http or https"));
    assert!(normalize_backend_url("not a url").is_err());
}
