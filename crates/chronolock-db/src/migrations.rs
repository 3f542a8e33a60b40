use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch("CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL);")?;

    let version: i64 = conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |r| r.get(0),
    )?;

    if version < 1 {
        info!("Running migration v1 (initial schema)");
        conn.execute_batch(
            "
            CREATE TABLE users (
                id           INTEGER PRIMARY KEY AUTOINCREMENT,
                id_number    TEXT NOT NULL UNIQUE,
                first_name   TEXT NOT NULL,
                last_name    TEXT NOT NULL,
                email        TEXT NOT NULL UNIQUE,
                password     TEXT NOT NULL,
                avatar       TEXT,
                account_name TEXT,
                user_type    TEXT NOT NULL DEFAULT 'student',
                created_at   TEXT NOT NULL DEFAULT (datetime('now')),
                updated_at   TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE groups (
                group_id   INTEGER PRIMARY KEY AUTOINCREMENT,
                group_name TEXT NOT NULL,
                group_key  TEXT NOT NULL UNIQUE,
                avatar     TEXT,
                created_at TEXT NOT NULL DEFAULT (datetime('now'))
            );

            CREATE TABLE group_members (
                id        INTEGER PRIMARY KEY AUTOINCREMENT,
                group_id  INTEGER NOT NULL
                          REFERENCES groups(group_id) ON DELETE CASCADE,
                id_number TEXT NOT NULL
                          REFERENCES users(id_number) ON DELETE CASCADE,
                UNIQUE (group_id, id_number)
            );

            CREATE INDEX idx_members_group ON group_members(group_id);

            -- user_id carries no foreign key: message insertion performs no
            -- sender validation, and the message list joins on it loosely.
            CREATE TABLE messages (
                id         INTEGER PRIMARY KEY AUTOINCREMENT,
                group_id   INTEGER NOT NULL
                           REFERENCES groups(group_id) ON DELETE CASCADE,
                user_id    TEXT NOT NULL,
                text       TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT (datetime('now')),
                is_seen    INTEGER NOT NULL DEFAULT 0,
                is_system  INTEGER NOT NULL DEFAULT 0
            );

            CREATE INDEX idx_messages_group ON messages(group_id, created_at);

            INSERT INTO schema_version (version) VALUES (1);
            ",
        )?;
    }

    Ok(())
}
