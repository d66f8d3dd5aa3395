use super::*;

use std::{
    collections::HashMap,
    env,
    time::{SystemTime, UNIX_EPOCH},
};

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key: &str| vars.get(key).cloned()
}

#[test]
fn file_values_override_defaults() {
    let mut settings = AdminSettings::default();
    apply_file(
        &mut settings,
        r#"
api_url = "https://forum.example.com/api"
token = "file-token"
request_timeout_secs = 5
"#,
    );

    assert_eq!(settings.api_url, "https://forum.example.com/api");
    assert_eq!(settings.token.as_deref(), Some("file-token"));
    assert_eq!(settings.request_timeout(), Duration::from_secs(5));
}

#[test]
fn malformed_file_is_ignored() {
    let mut settings = AdminSettings::default();
    apply_file(&mut settings, "api_url = [");
    assert_eq!(settings, AdminSettings::default());
}

#[test]
fn app_prefixed_env_wins_over_plain_env() {
    let mut settings = AdminSettings::default();
    apply_env(
        &mut settings,
        env_of(&[
            ("FORUM_API_URL", "http://plain"),
            ("APP__API_URL", "http://prefixed"),
            ("FORUM_API_TOKEN", "env-token"),
        ]),
    );

    assert_eq!(settings.api_url, "http://prefixed");
    assert_eq!(settings.token.as_deref(), Some("env-token"));
}

#[test]
fn invalid_timeout_keeps_previous_value() {
    let mut settings = AdminSettings::default();
    apply_env(
        &mut settings,
        env_of(&[("APP__REQUEST_TIMEOUT_SECS", "soon")]),
    );
    assert_eq!(settings.request_timeout_secs, 30);

    settings.request_timeout_secs = 0;
    assert_eq!(settings.request_timeout(), Duration::from_secs(1));
}

#[test]
fn load_settings_reads_config_file() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = env::temp_dir().join(format!("forum_admin_config_test_{suffix}"));
    fs::create_dir_all(&temp_root).expect("temp root");
    let path = temp_root.join("forum-admin.toml");
    fs::write(
        &path,
        "request_timeout_secs = 12\napi_url = \"http://file\"\n",
    )
    .expect("write config");

    let settings = load_settings(&path, env_of(&[]));
    assert_eq!(settings.request_timeout_secs, 12);
    assert_eq!(settings.api_url, "http://file");

    let settings = load_settings(&path, env_of(&[("APP__API_URL", "http://env")]));
    assert_eq!(settings.api_url, "http://env");
    assert_eq!(settings.request_timeout_secs, 12);

    fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn missing_file_falls_back_to_defaults() {
    let settings = load_settings(Path::new("/nonexistent/forum-admin.toml"), env_of(&[]));
    assert_eq!(settings.request_timeout_secs, 30);
}
