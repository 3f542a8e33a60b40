use anyhow::Result;
use rusqlite::{Connection, OptionalExtension, params};

use crate::Database;
use crate::models::{GroupSummaryRow, MemberRow, MessageRow, UserRow};

const USER_COLUMNS: &str = "id, id_number, first_name, last_name, email, password, \
                            avatar, account_name, user_type, created_at, updated_at";

/// Shared SELECT for the three group listings: every group joined with its
/// single most-recent message. Ties on created_at break toward the higher
/// message id, so the "latest" row is deterministic.
const GROUP_SUMMARY_SELECT: &str = "
    SELECT g.avatar, g.group_id, g.group_name, g.group_key,
           m.text, m.created_at, m.is_seen, u.first_name
    FROM groups g
    LEFT JOIN messages m ON m.id =
        (SELECT id FROM messages
         WHERE group_id = g.group_id
         ORDER BY created_at DESC, id DESC
         LIMIT 1)
    LEFT JOIN users u ON u.id_number = m.user_id";

impl Database {
    // -- Users --

    pub fn insert_user(
        &self,
        id_number: &str,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
        user_type: &str,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO users (id_number, first_name, last_name, email, password, user_type)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![id_number, first_name, last_name, email, password, user_type],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "email = ?1", params![email]))
    }

    pub fn get_user_by_id(&self, id: i64) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user(conn, "id = ?1", params![id]))
    }

    /// Full-profile update. Password and avatar keep their stored value when
    /// no replacement is supplied. Returns the number of rows touched.
    pub fn update_user(
        &self,
        id: i64,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: Option<&str>,
        avatar: Option<&str>,
    ) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE users
                 SET first_name = ?1,
                     last_name = ?2,
                     email = ?3,
                     password = COALESCE(?4, password),
                     avatar = COALESCE(?5, avatar),
                     updated_at = datetime('now')
                 WHERE id = ?6",
                params![first_name, last_name, email, password, avatar, id],
            )?;
            Ok(n)
        })
    }

    pub fn delete_user(&self, id: i64) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM users WHERE id = ?1", [id])?;
            Ok(n)
        })
    }

    pub fn reset_password(&self, email: &str, new_password: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE users SET password = ?1, updated_at = datetime('now') WHERE email = ?2",
                params![new_password, email],
            )?;
            Ok(n)
        })
    }

    pub fn update_password(&self, user_id: i64, new_password: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE users SET password = ?1, updated_at = datetime('now') WHERE id = ?2",
                params![new_password, user_id],
            )?;
            Ok(n)
        })
    }

    // -- Groups --

    /// Insert a group and its owner's membership row as one atomic unit:
    /// either both land or neither is visible.
    pub fn create_group_with_owner(
        &self,
        name: &str,
        group_key: &str,
        avatar: Option<&str>,
        owner_id_number: &str,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "INSERT INTO groups (group_name, group_key, avatar) VALUES (?1, ?2, ?3)",
                params![name, group_key, avatar],
            )?;
            let group_id = tx.last_insert_rowid();
            tx.execute(
                "INSERT INTO group_members (group_id, id_number) VALUES (?1, ?2)",
                params![group_id, owner_id_number],
            )?;
            tx.commit()?;
            Ok(group_id)
        })
    }

    /// `None` when the group does not exist; `Some(avatar)` otherwise.
    pub fn get_group_avatar(&self, group_id: i64) -> Result<Option<Option<String>>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT avatar FROM groups WHERE group_id = ?1",
                    [group_id],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(row)
        })
    }

    pub fn update_group(
        &self,
        group_id: i64,
        name: &str,
        group_key: &str,
        avatar: Option<&str>,
    ) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE groups
                 SET group_name = ?1, group_key = ?2, avatar = COALESCE(?3, avatar)
                 WHERE group_id = ?4",
                params![name, group_key, avatar, group_id],
            )?;
            Ok(n)
        })
    }

    pub fn delete_group(&self, group_id: i64) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute("DELETE FROM groups WHERE group_id = ?1", [group_id])?;
            Ok(n)
        })
    }

    /// Groups the user belongs to.
    pub fn groups_for_member(&self, id_number: &str) -> Result<Vec<GroupSummaryRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{GROUP_SUMMARY_SELECT}
                 JOIN group_members gm
                   ON gm.group_id = g.group_id AND gm.id_number = ?1
                 ORDER BY m.created_at DESC"
            );
            query_group_summaries(conn, &sql, params![id_number])
        })
    }

    pub fn all_groups(&self) -> Result<Vec<GroupSummaryRow>> {
        self.with_conn(|conn| {
            let sql = format!("{GROUP_SUMMARY_SELECT} ORDER BY m.created_at DESC");
            query_group_summaries(conn, &sql, params![])
        })
    }

    /// Groups the user does not yet belong to.
    pub fn groups_available_to(&self, id_number: &str) -> Result<Vec<GroupSummaryRow>> {
        self.with_conn(|conn| {
            let sql = format!(
                "{GROUP_SUMMARY_SELECT}
                 WHERE g.group_id NOT IN
                     (SELECT group_id FROM group_members WHERE id_number = ?1)
                 ORDER BY m.created_at DESC"
            );
            query_group_summaries(conn, &sql, params![id_number])
        })
    }

    // -- Group members --

    pub fn member_count(&self, group_id: i64) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM group_members WHERE group_id = ?1",
                [group_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    pub fn members_of_group(&self, group_id: i64) -> Result<Vec<MemberRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT gm.id, g.group_id, u.id_number, u.first_name, u.last_name,
                        u.avatar, u.user_type
                 FROM group_members gm
                 JOIN groups g ON g.group_id = gm.group_id
                 JOIN users u ON u.id_number = gm.id_number
                 WHERE g.group_id = ?1",
            )?;
            let rows = stmt
                .query_map([group_id], |row| {
                    Ok(MemberRow {
                        id: row.get(0)?,
                        group_id: row.get(1)?,
                        id_number: row.get(2)?,
                        first_name: row.get(3)?,
                        last_name: row.get(4)?,
                        avatar: row.get(5)?,
                        user_type: row.get(6)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn find_group_by_key(&self, group_key: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            let id = conn
                .query_row(
                    "SELECT group_id FROM groups WHERE group_key = ?1",
                    [group_key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(id)
        })
    }

    pub fn is_member(&self, group_id: i64, id_number: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let existing: Option<i64> = conn
                .query_row(
                    "SELECT id FROM group_members WHERE group_id = ?1 AND id_number = ?2",
                    params![group_id, id_number],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(existing.is_some())
        })
    }

    pub fn add_member(&self, group_id: i64, id_number: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO group_members (group_id, id_number) VALUES (?1, ?2)",
                params![group_id, id_number],
            )?;
            Ok(())
        })
    }

    pub fn remove_member(&self, group_id: i64, id_number: &str) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "DELETE FROM group_members WHERE group_id = ?1 AND id_number = ?2",
                params![group_id, id_number],
            )?;
            Ok(n)
        })
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        group_id: i64,
        user_id: &str,
        text: &str,
        is_system: bool,
    ) -> Result<i64> {
        self.with_conn_mut(|conn| {
            conn.execute(
                "INSERT INTO messages (group_id, user_id, text, is_system) VALUES (?1, ?2, ?3, ?4)",
                params![group_id, user_id, text, is_system as i64],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// All messages for a group joined with the sender, newest first.
    /// Messages from unknown senders are dropped by the inner join.
    pub fn messages_for_group(&self, group_id: i64) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.group_id, m.text, m.created_at, m.user_id,
                        m.is_seen, m.is_system, u.first_name, u.last_name,
                        u.avatar AS user_avatar
                 FROM messages m
                 JOIN users u ON m.user_id = u.id_number
                 WHERE m.group_id = ?1
                 ORDER BY m.created_at DESC, m.id DESC",
            )?;
            let rows = stmt
                .query_map([group_id], |row| {
                    Ok(MessageRow {
                        id: row.get(0)?,
                        group_id: row.get(1)?,
                        text: row.get(2)?,
                        created_at: row.get(3)?,
                        user_id: row.get(4)?,
                        is_seen: row.get(5)?,
                        is_system: row.get(6)?,
                        first_name: row.get(7)?,
                        last_name: row.get(8)?,
                        user_avatar: row.get(9)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Flag the single most-recent message as seen. Returns the number of
    /// rows touched: 0 for a group with no messages, never an error.
    pub fn mark_latest_seen(&self, group_id: i64) -> Result<usize> {
        self.with_conn_mut(|conn| {
            let n = conn.execute(
                "UPDATE messages SET is_seen = 1
                 WHERE id = (SELECT id FROM messages
                             WHERE group_id = ?1
                             ORDER BY created_at DESC, id DESC
                             LIMIT 1)",
                [group_id],
            )?;
            Ok(n)
        })
    }
}

fn query_user(
    conn: &Connection,
    filter: &str,
    params: impl rusqlite::Params,
) -> Result<Option<UserRow>> {
    let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {filter}");
    let row = conn
        .query_row(&sql, params, |row| {
            Ok(UserRow {
                id: row.get(0)?,
                id_number: row.get(1)?,
                first_name: row.get(2)?,
                last_name: row.get(3)?,
                email: row.get(4)?,
                password: row.get(5)?,
                avatar: row.get(6)?,
                account_name: row.get(7)?,
                user_type: row.get(8)?,
                created_at: row.get(9)?,
                updated_at: row.get(10)?,
            })
        })
        .optional()?;
    Ok(row)
}

fn query_group_summaries(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> Result<Vec<GroupSummaryRow>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, |row| {
            Ok(GroupSummaryRow {
                avatar: row.get(0)?,
                group_id: row.get(1)?,
                group_name: row.get(2)?,
                group_key: row.get(3)?,
                latest_message: row.get(4)?,
                message_time: row.get(5)?,
                latest_message_is_seen: row.get(6)?,
                sender: row.get(7)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(rows)
}
