use studydesk_core::db::migrations::latest_version;
use studydesk_core::db::{open_db, open_db_in_memory};

#[test]
fn migrations_apply_and_record_latest_version() {
    let conn = open_db_in_memory().unwrap();

    let user_version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(user_version, latest_version());
    assert!(latest_version() >= 3);
}

#[test]
fn migrations_create_all_core_tables() {
    let conn = open_db_in_memory().unwrap();

    for table in [
        "workspaces",
        "folders",
        "items",
        "todos",
        "tags",
        "item_tags",
        "focus_entries",
    ] {
        let exists: i64 = conn
            .query_row(
                "SELECT EXISTS(
                    SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1
                );",
                [table],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(exists, 1, "table `{table}` should exist");
    }
}

#[test]
fn foreign_keys_are_enabled() {
    let conn = open_db_in_memory().unwrap();
    let enabled: i64 = conn
        .query_row("PRAGMA foreign_keys;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(enabled, 1);
}

#[test]
fn reopening_a_file_database_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("studydesk.sqlite3");

    {
        let conn = open_db(&db_path).unwrap();
        conn.execute(
            "INSERT INTO workspaces (workspace_uuid, owner_id, title) VALUES ('w-1', 'o-1', 'Rust');",
            [],
        )
        .unwrap();
    }

    let conn = open_db(&db_path).unwrap();
    let user_version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(user_version, latest_version());

    let count: i64 = conn
        .query_row("SELECT COUNT(*) FROM workspaces;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(count, 1);
}
