use anyhow::Result;
use rusqlite::Connection;
use tracing::{debug, info};
use uuid::Uuid;

use super::{OptionalExt, collect_users};
use crate::Database;
use crate::models::{USER_COLUMNS, UserRow};
use warbler_types::WarblerError;
use warbler_types::models::{
    DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL, ProfileSummary, User, UserId,
};

/// A validated signup, password already hashed.
pub struct NewUser<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub image_url: Option<&'a str>,
}

/// Replacement profile fields. `None` image urls fall back to the defaults.
pub struct ProfileUpdate<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub image_url: Option<&'a str>,
    pub header_image_url: Option<&'a str>,
    pub bio: Option<&'a str>,
}

impl Database {
    // -- Identity store --

    /// Duplicate username or email surfaces here as `Uniqueness`.
    pub fn create_user(&self, new: &NewUser<'_>) -> warbler_types::Result<User> {
        let user = User {
            id: Uuid::new_v4(),
            username: new.username.to_string(),
            email: new.email.to_string(),
            password: new.password_hash.to_string(),
            image_url: new.image_url.unwrap_or(DEFAULT_IMAGE_URL).to_string(),
            header_image_url: DEFAULT_HEADER_IMAGE_URL.to_string(),
            bio: None,
        };

        self.with_tx(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password, image_url, header_image_url)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    user.id.to_string(),
                    user.username,
                    user.email,
                    user.password,
                    user.image_url,
                    user.header_image_url,
                ],
            )?;
            Ok(())
        })?;

        info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }

    pub fn get_user(&self, id: UserId) -> warbler_types::Result<Option<User>> {
        self.with_conn(|conn| query_user(conn, "u.id", &id.to_string()))
    }

    pub fn get_user_by_username(&self, username: &str) -> warbler_types::Result<Option<User>> {
        self.with_conn(|conn| query_user(conn, "u.username", username))
    }

    /// All users ordered by username, optionally narrowed to usernames
    /// containing `search` (case-insensitive).
    pub fn list_users(&self, search: Option<&str>) -> warbler_types::Result<Vec<User>> {
        let search = search.map(str::trim).filter(|s| !s.is_empty());
        self.with_conn(|conn| match search {
            Some(term) => collect_users(
                conn,
                &format!(
                    "SELECT {USER_COLUMNS} FROM users u
                     WHERE u.username LIKE '%' || ?1 || '%' ESCAPE '\\'
                     ORDER BY u.username"
                ),
                [escape_like(term)],
            ),
            None => collect_users(
                conn,
                &format!("SELECT {USER_COLUMNS} FROM users u ORDER BY u.username"),
                [],
            ),
        })
    }

    /// Uniqueness is re-checked by the constraint; a user keeping their own
    /// username or email never conflicts with themselves.
    pub fn update_user(&self, id: UserId, update: &ProfileUpdate<'_>) -> warbler_types::Result<User> {
        let user = self.with_tx(|conn| {
            let changed = conn.execute(
                "UPDATE users
                 SET username = ?2, email = ?3, image_url = ?4, header_image_url = ?5, bio = ?6
                 WHERE id = ?1",
                rusqlite::params![
                    id.to_string(),
                    update.username,
                    update.email,
                    update.image_url.unwrap_or(DEFAULT_IMAGE_URL),
                    update.header_image_url.unwrap_or(DEFAULT_HEADER_IMAGE_URL),
                    update.bio,
                ],
            )?;
            if changed == 0 {
                return Err(WarblerError::not_found("user", id).into());
            }
            query_user(conn, "u.id", &id.to_string())?
                .ok_or_else(|| WarblerError::not_found("user", id).into())
        })?;

        info!(user_id = %id, username = %user.username, "profile updated");
        Ok(user)
    }

    /// Messages, follows and likes referencing the user go with it.
    pub fn delete_user(&self, id: UserId) -> warbler_types::Result<bool> {
        let deleted = self.with_tx(|conn| {
            Ok(conn.execute("DELETE FROM users WHERE id = ?1", [id.to_string()])? > 0)
        })?;
        if deleted {
            info!(user_id = %id, "user deleted");
        } else {
            debug!(user_id = %id, "delete_user: no such user");
        }
        Ok(deleted)
    }

    pub fn profile_summary(&self, id: UserId) -> warbler_types::Result<Option<ProfileSummary>> {
        self.with_conn(|conn| {
            let Some(user) = query_user(conn, "u.id", &id.to_string())? else {
                return Ok(None);
            };
            let (messages, following, followers, likes) = conn.query_row(
                "SELECT
                    (SELECT COUNT(*) FROM messages WHERE user_id = ?1),
                    (SELECT COUNT(*) FROM follows WHERE user_following_id = ?1),
                    (SELECT COUNT(*) FROM follows WHERE user_being_followed_id = ?1),
                    (SELECT COUNT(*) FROM likes WHERE user_id = ?1)",
                [id.to_string()],
                |row| {
                    Ok((
                        row.get::<_, i64>(0)? as u64,
                        row.get::<_, i64>(1)? as u64,
                        row.get::<_, i64>(2)? as u64,
                        row.get::<_, i64>(3)? as u64,
                    ))
                },
            )?;
            Ok(Some(ProfileSummary {
                user,
                messages,
                following,
                followers,
                likes,
            }))
        })
    }
}

fn query_user(conn: &Connection, column: &str, value: &str) -> Result<Option<User>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {USER_COLUMNS} FROM users u WHERE {column} = ?1"
    ))?;

    let row = stmt.query_row([value], UserRow::from_row).optional()?;
    row.map(UserRow::into_user).transpose()
}

fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
