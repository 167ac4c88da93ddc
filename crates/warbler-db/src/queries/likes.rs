use tracing::debug;

use super::{OptionalExt, collect_messages, message_exists};
use crate::Database;
use crate::models::{MESSAGE_COLUMNS, parse_id};
use warbler_types::WarblerError;
use warbler_types::models::{Message, MessageId, UserId};

impl Database {
    // -- Relationship store: likes --

    /// Toggle a like: removes if it exists, inserts if not. Returns whether
    /// the message is liked afterwards.
    ///
    /// The check and the write share one IMMEDIATE transaction, so two
    /// concurrent toggles of the same pair see each other's result.
    pub fn toggle_like(&self, user: UserId, message: MessageId) -> warbler_types::Result<bool> {
        let liked = self.with_tx(|conn| {
            if !message_exists(conn, message)? {
                return Err(WarblerError::not_found("message", message).into());
            }

            let (uid, mid) = (user.to_string(), message.to_string());
            let existing = conn
                .query_row(
                    "SELECT 1 FROM likes WHERE user_id = ?1 AND message_id = ?2",
                    [&uid, &mid],
                    |_| Ok(()),
                )
                .optional()?;

            if existing.is_some() {
                conn.execute(
                    "DELETE FROM likes WHERE user_id = ?1 AND message_id = ?2",
                    [&uid, &mid],
                )?;
                Ok(false)
            } else {
                conn.execute(
                    "INSERT INTO likes (user_id, message_id) VALUES (?1, ?2)",
                    [&uid, &mid],
                )?;
                Ok(true)
            }
        })?;

        debug!(user_id = %user, message_id = %message, liked, "like toggled");
        Ok(liked)
    }

    pub fn has_liked(&self, user: UserId, message: MessageId) -> warbler_types::Result<bool> {
        self.with_conn(|conn| {
            let found = conn
                .query_row(
                    "SELECT 1 FROM likes WHERE user_id = ?1 AND message_id = ?2",
                    [user.to_string(), message.to_string()],
                    |_| Ok(()),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    /// Messages `user` has liked, newest message first.
    pub fn liked_messages(&self, user: UserId) -> warbler_types::Result<Vec<Message>> {
        self.with_conn(|conn| {
            collect_messages(
                conn,
                &format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages m
                     JOIN likes l ON l.message_id = m.id
                     WHERE l.user_id = ?1
                     ORDER BY m.timestamp DESC"
                ),
                [user.to_string()],
            )
        })
    }

    /// Ids only, for marking liked messages in a feed.
    pub fn liked_message_ids(&self, user: UserId) -> warbler_types::Result<Vec<MessageId>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT message_id FROM likes WHERE user_id = ?1")?;
            let raw = stmt
                .query_map([user.to_string()], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            raw.iter().map(|id| parse_id(id)).collect()
        })
    }
}
