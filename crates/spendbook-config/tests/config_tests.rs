use spendbook_config::{Config, ConfigError, ConfigManager, Theme};
use tempfile::tempdir;

#[test]
fn default_config_targets_indian_rupees() {
    let cfg = Config::default();

    assert_eq!(cfg.locale, "en-IN");
    assert_eq!(cfg.currency, "INR");
    assert_eq!(cfg.theme, Theme::Light);
    assert_eq!(cfg.default_view, "all");
    assert!(cfg.active_remote().is_none());
}

#[test]
fn config_manager_persists_and_loads_config() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::new(dir.path().join("config.json"), dir.path().join("backups"));

    let mut cfg = Config::default();
    cfg.set("currency", "usd").expect("currency");
    cfg.set("theme", "dark").expect("theme");
    cfg.set("remote.url", "https://example.supabase.co/").expect("url");

    manager.save(&cfg).expect("save config");
    let loaded = manager.load().expect("load config");

    assert_eq!(loaded.currency, "USD");
    assert_eq!(loaded.theme, Theme::Dark);
    assert_eq!(
        loaded.remote.as_ref().map(|r| r.url.as_str()),
        Some("https://example.supabase.co")
    );
    assert!(!dir.path().join("config.json.tmp").exists());
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let dir = tempdir().expect("tempdir");
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"theme":"purple"}"#).unwrap();
    let manager = ConfigManager::new(path, dir.path().join("backups"));
    let loaded = manager.load().expect("load");
    assert_eq!(loaded.theme, Theme::Light);
    assert_eq!(loaded.currency, "INR");
    assert_eq!(loaded.trend_days, 7);
}

#[test]
fn set_rejects_unknown_keys_and_bad_values() {
    let mut cfg = Config::default();
    assert!(matches!(cfg.set("colour", "x"), Err(ConfigError::UnknownKey(_))));
    assert!(matches!(
        cfg.set("default_view", "weekly"),
        Err(ConfigError::InvalidValue { .. })
    ));
    assert!(cfg.set("trend_days", "0").is_err());
    assert!(cfg.set("trend_days", "97000000").is_err());
    assert!(cfg.set("currency", "rupees").is_err());
    assert_eq!(cfg, Config::default());
}

#[test]
fn trend_days_accepts_up_to_a_year() {
    let mut cfg = Config::default();
    cfg.set("trend_days", "366").unwrap();
    assert_eq!(cfg.trend_days, 366);
    let err = cfg.set("trend_days", "367").unwrap_err();
    assert!(err.to_string().contains("between 1 and 366"));
    assert_eq!(cfg.trend_days, 366);
}

#[test]
fn remote_requires_url_key_and_token() {
    let mut cfg = Config::default();
    cfg.set("remote.url", "https://db.example").unwrap();
    cfg.set("remote.api_key", "anon").unwrap();
    assert!(cfg.active_remote().is_none());
    cfg.set("remote.access_token", "token").unwrap();
    assert!(cfg.active_remote().is_some());

    let masked = cfg
        .entries()
        .into_iter()
        .find(|(key, _)| *key == "remote.access_token")
        .map(|(_, value)| value);
    assert_eq!(masked.as_deref(), Some("********"));
}

#[test]
fn backups_can_be_listed_and_restored() {
    let dir = tempdir().expect("tempdir");
    let manager = ConfigManager::with_base_dir(dir.path().to_path_buf()).expect("manager");

    let mut cfg = Config::default();
    cfg.set("user_name", "Asha").unwrap();
    let name = manager.backup(&cfg, Some("Before sync")).expect("backup");
    assert!(name.ends_with("_before-sync.json"));

    manager.save(&Config::default()).expect("save");
    assert_eq!(manager.list_backups().expect("list"), vec![name.clone()]);

    let restored = manager.restore(&name).expect("restore");
    assert_eq!(restored.display_name(), "Asha");
    assert_eq!(manager.load().expect("load").display_name(), "Asha");
}
