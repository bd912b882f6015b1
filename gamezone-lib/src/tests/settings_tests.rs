use std::collections::HashMap;

use super::*;

#[test]
fn partial_file_keeps_defaults() {
    let settings = Settings::from_toml(
        r#"
        [mirror]
        jobs = 4

        [retry]
        backoff = "fixed"
        "#,
    )
    .unwrap();
    assert_eq!(settings.mirror.jobs, 4);
    assert_eq!(settings.mirror.asset_branch, "main");
    assert_eq!(settings.retry.backoff, Backoff::Fixed);
    assert_eq!(settings.retry.max_retries, 3);
    assert_eq!(settings.endpoints, Endpoints::default());
}

#[test]
fn env_overrides_file_values() {
    let env = HashMap::from([
        ("JOBS", "3"),
        ("GAMEZONE_OUTPUT", "/tmp/mirror"),
        ("GAMEZONE_HTML_BASE", "https://html.local"),
    ]);
    let mut settings = Settings::default();
    settings.apply_env(|k| env.get(k).map(|v| v.to_string()));
    assert_eq!(settings.mirror.jobs, 3);
    assert_eq!(settings.mirror.output_dir, PathBuf::from("/tmp/mirror"));
    assert_eq!(settings.endpoints.html_base, "https://html.local");
    assert_eq!(settings.endpoints.cover_base, Endpoints::default().cover_base);
}

#[test]
fn invalid_jobs_is_ignored() {
    for bad in ["zero", "0", "-2", ""] {
        let mut settings = Settings::default();
        settings.apply_env(|k| (k == "JOBS").then(|| bad.to_string()));
        assert_eq!(settings.mirror.jobs, DEFAULT_JOBS, "JOBS={bad:?} should be ignored");
    }
}

#[test]
fn explicit_missing_path_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert!(matches!(Settings::load(Some(&missing)), Err(SettingsError::NotFound(_))));
}

#[test]
fn save_then_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("settings.toml");
    let mut settings = Settings::default();
    settings.mirror.sparse_paths = vec!["12".into(), "40".into()];
    settings.endpoints.catalogue_aliases = vec!["main".into()];
    settings.save(&path).unwrap();

    let loaded = Settings::from_file(&path).unwrap();
    assert_eq!(loaded.mirror.sparse_paths, vec!["12", "40"]);
    assert_eq!(loaded.endpoints.catalogue_aliases, vec!["main"]);
}

#[test]
fn malformed_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("settings.toml");
    std::fs::write(&path, "[mirror]\njobs = \"many\"\n").unwrap();
    let err = Settings::from_file(&path).unwrap_err();
    assert!(matches!(err, SettingsError::Parse { .. }));
    assert!(err.to_string().contains("settings.toml"));
}

#[test]
fn retry_settings_convert_to_policy() {
    let retry = RetrySettings {
        max_retries: 2,
        delay_ms: 500,
        backoff: Backoff::Linear,
    };
    let policy = retry.policy();
    assert_eq!(policy.max_retries, 2);
    assert_eq!(policy.delay_for(2), Duration::from_secs(1));
}
