//! Settings store tests

use honeydash::filesys::file::File;
use honeydash::logs::LogLevel;
use honeydash::storage::layout::StorageLayout;
use honeydash::storage::settings::{Settings, SettingsStore, Theme};

fn store(dir: &tempfile::TempDir) -> SettingsStore {
    SettingsStore::new(StorageLayout::new(dir.path()).settings_file())
}

#[tokio::test]
async fn test_missing_file_loads_defaults() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(store(&dir).load().await, Settings::default());
}

#[tokio::test]
async fn test_save_then_load() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);

    let mut settings = Settings::default();
    settings.set("theme", "light").unwrap();
    settings.set("refresh_interval_secs", "12").unwrap();
    store.save(&settings).await.unwrap();

    let loaded = store.load().await;
    assert_eq!(loaded.theme, Theme::Light);
    assert_eq!(loaded.refresh_interval_secs, 12);
}

#[tokio::test]
async fn test_corrupt_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    store.file().write_string("{not json").await.unwrap();

    assert_eq!(store.load().await, Settings::default());
}

#[tokio::test]
async fn test_reset() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    let mut settings = Settings::default();
    settings.auto_refresh = false;
    store.save(&settings).await.unwrap();

    assert_eq!(store.reset().await.unwrap(), Settings::default());
    assert!(store.load().await.auto_refresh);
}

#[tokio::test]
async fn test_export_and_import() {
    let dir = tempfile::tempdir().unwrap();
    let store = store(&dir);
    let mut settings = Settings::default();
    settings.advanced.log_level = LogLevel::Debug;
    store.save(&settings).await.unwrap();

    let exported = dir.path().join("export").join("settings.json");
    store.export(&exported).await.unwrap();

    let other_dir = tempfile::tempdir().unwrap();
    let other = SettingsStore::new(StorageLayout::new(other_dir.path()).settings_file());
    let imported = other.import(&exported).await.unwrap();
    assert_eq!(imported.advanced.log_level, LogLevel::Debug);
    assert_eq!(other.load().await, settings);
}

#[tokio::test]
async fn test_import_rejects_invalid_file() {
    let dir = tempfile::tempdir().unwrap();
    let bogus = dir.path().join("bogus.json");
    File::new(&bogus).write_string("[1, 2, 3]").await.unwrap();

    let store = store(&dir);
    assert!(store.import(&bogus).await.is_err());
    assert!(!store.file().exists().await);
}
