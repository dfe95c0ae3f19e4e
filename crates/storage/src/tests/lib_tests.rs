use super::*;

#[tokio::test]
async fn focus_slot_starts_empty() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let focus = storage.load_focus().await.expect("load");
    assert_eq!(focus, None);
}

#[tokio::test]
async fn saves_and_reloads_focus() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    storage
        .save_focus(Some(PanelId(3)))
        .await
        .expect("save focus");
    assert_eq!(storage.load_focus().await.expect("load"), Some(PanelId(3)));

    storage.save_focus(None).await.expect("clear focus");
    assert_eq!(storage.load_focus().await.expect("load"), None);
}

#[tokio::test]
async fn overwrites_previous_focus_in_place() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    storage.save_focus(Some(PanelId(1))).await.expect("first");
    storage.save_focus(Some(PanelId(4))).await.expect("second");

    assert_eq!(storage.load_focus().await.expect("load"), Some(PanelId(4)));
    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM dashboard_prefs")
        .fetch_one(&storage.pool)
        .await
        .expect("count");
    assert_eq!(rows, 1);
}

#[tokio::test]
async fn corrupt_saved_value_reads_as_no_focus() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");

    sqlx::query("INSERT INTO dashboard_prefs (key, value, updated_at) VALUES (?, ?, ?)")
        .bind(FOCUS_KEY)
        .bind("{not json")
        .bind(Utc::now())
        .execute(&storage.pool)
        .await
        .expect("insert garbage");

    assert_eq!(storage.load_focus().await.expect("load"), None);
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let suffix = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let temp_root = std::env::temp_dir().join(format!("schedboard_storage_test_{suffix}"));
    let db_path = temp_root.join("nested").join("prefs.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    storage.save_focus(Some(PanelId(2))).await.expect("save");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );

    std::fs::remove_dir_all(temp_root).expect("cleanup");
}

#[test]
fn normalizes_plain_file_path_to_sqlite_url() {
    assert_eq!(
        normalize_database_url("./data/prefs.db"),
        "sqlite://./data/prefs.db"
    );
    assert_eq!(
        normalize_database_url("sqlite:data/prefs.db"),
        "sqlite://data/prefs.db"
    );
    assert_eq!(normalize_database_url("sqlite::memory:"), "sqlite::memory:");
}
