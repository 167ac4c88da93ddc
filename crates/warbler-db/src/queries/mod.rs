pub mod follows;
pub mod likes;
pub mod messages;
pub mod users;

use anyhow::Result;
use rusqlite::{Connection, Params};

use crate::models::{MessageRow, UserRow};
use warbler_types::models::{Message, MessageId, User, UserId};

pub(crate) fn collect_users<P: Params>(conn: &Connection, sql: &str, params: P) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, UserRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    rows.into_iter().map(UserRow::into_user).collect()
}

pub(crate) fn collect_messages<P: Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<Message>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt
        .query_map(params, MessageRow::from_row)?
        .collect::<std::result::Result<Vec<_>, _>>()?;
    rows.into_iter().map(MessageRow::into_message).collect()
}

pub(crate) fn user_exists(conn: &Connection, id: UserId) -> Result<bool> {
    exists(conn, "SELECT 1 FROM users WHERE id = ?1", &id.to_string())
}

pub(crate) fn message_exists(conn: &Connection, id: MessageId) -> Result<bool> {
    exists(conn, "SELECT 1 FROM messages WHERE id = ?1", &id.to_string())
}

fn exists(conn: &Connection, sql: &str, id: &str) -> Result<bool> {
    Ok(conn.query_row(sql, [id], |_| Ok(())).optional()?.is_some())
}

/// Extension trait for optional query results
pub(crate) trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
