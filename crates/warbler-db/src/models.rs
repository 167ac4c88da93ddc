/// Database row types. These map directly to SQLite rows.
/// Distinct from warbler-types domain models to keep the DB layer independent;
/// `into_*` does the parsing of ids and timestamps.
use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;

use warbler_types::models::{Message, User};

/// Column list matching `UserRow::from_row`, with `users` aliased as `u`.
pub const USER_COLUMNS: &str =
    "u.id, u.username, u.email, u.password, u.image_url, u.header_image_url, u.bio";

/// Column list matching `MessageRow::from_row`, with `messages` aliased as `m`.
pub const MESSAGE_COLUMNS: &str = "m.id, m.text, m.timestamp, m.user_id";

pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: Option<String>,
}

impl UserRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            username: row.get(1)?,
            email: row.get(2)?,
            password: row.get(3)?,
            image_url: row.get(4)?,
            header_image_url: row.get(5)?,
            bio: row.get(6)?,
        })
    }

    pub fn into_user(self) -> Result<User> {
        Ok(User {
            id: parse_id(&self.id)?,
            username: self.username,
            email: self.email,
            password: self.password,
            image_url: self.image_url,
            header_image_url: self.header_image_url,
            bio: self.bio,
        })
    }
}

pub struct MessageRow {
    pub id: String,
    pub text: String,
    pub timestamp: String,
    pub user_id: String,
}

impl MessageRow {
    pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            text: row.get(1)?,
            timestamp: row.get(2)?,
            user_id: row.get(3)?,
        })
    }

    pub fn into_message(self) -> Result<Message> {
        Ok(Message {
            id: parse_id(&self.id)?,
            timestamp: parse_timestamp(&self.timestamp)
                .with_context(|| format!("corrupt timestamp on message {}", self.id))?,
            user_id: parse_id(&self.user_id)?,
            text: self.text,
        })
    }
}

pub fn parse_id(raw: &str) -> Result<Uuid> {
    raw.parse().with_context(|| format!("corrupt id '{raw}'"))
}

/// Fixed-width RFC 3339 so that text ordering is time ordering.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(raw)?.with_timezone(&Utc))
}
