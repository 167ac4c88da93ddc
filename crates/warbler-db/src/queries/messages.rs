use chrono::{DateTime, SubsecRound, Utc};
use tracing::{debug, info};
use uuid::Uuid;

use super::{OptionalExt, collect_messages, user_exists};
use crate::Database;
use crate::models::{MESSAGE_COLUMNS, MessageRow, format_timestamp};
use warbler_types::WarblerError;
use warbler_types::models::{Message, MessageId, UserId};

impl Database {
    // -- Content store --

    /// Text must already be validated. The timestamp is kept at microsecond
    /// precision, the precision it is stored with.
    pub fn create_message(
        &self,
        user_id: UserId,
        text: &str,
        timestamp: DateTime<Utc>,
    ) -> warbler_types::Result<Message> {
        let message = Message {
            id: Uuid::new_v4(),
            text: text.to_string(),
            timestamp: timestamp.trunc_subsecs(6),
            user_id,
        };

        self.with_tx(|conn| {
            if !user_exists(conn, user_id)? {
                return Err(WarblerError::not_found("user", user_id).into());
            }
            conn.execute(
                "INSERT INTO messages (id, text, timestamp, user_id) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![
                    message.id.to_string(),
                    message.text,
                    format_timestamp(&message.timestamp),
                    user_id.to_string(),
                ],
            )?;
            Ok(())
        })?;

        info!(message_id = %message.id, user_id = %user_id, "message created");
        Ok(message)
    }

    pub fn get_message(&self, id: MessageId) -> warbler_types::Result<Option<Message>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    &format!("SELECT {MESSAGE_COLUMNS} FROM messages m WHERE m.id = ?1"),
                    [id.to_string()],
                    MessageRow::from_row,
                )
                .optional()?;
            row.map(MessageRow::into_message).transpose()
        })
    }

    /// Removes the message only if `owner` owns it; likes on it cascade.
    /// Returns whether a row was removed.
    pub fn delete_owned_message(&self, id: MessageId, owner: UserId) -> warbler_types::Result<bool> {
        let deleted = self.with_tx(|conn| {
            Ok(conn.execute(
                "DELETE FROM messages WHERE id = ?1 AND user_id = ?2",
                [id.to_string(), owner.to_string()],
            )? > 0)
        })?;
        if deleted {
            info!(message_id = %id, user_id = %owner, "message deleted");
        } else {
            debug!(message_id = %id, user_id = %owner, "delete_owned_message: nothing to delete");
        }
        Ok(deleted)
    }

    /// Newest first.
    pub fn messages_by_user(&self, user_id: UserId, limit: u32) -> warbler_types::Result<Vec<Message>> {
        self.with_conn(|conn| {
            collect_messages(
                conn,
                &format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages m
                     WHERE m.user_id = ?1
                     ORDER BY m.timestamp DESC
                     LIMIT ?2"
                ),
                rusqlite::params![user_id.to_string(), limit],
            )
        })
    }

    /// Home feed: the user's own messages and those of everyone they follow,
    /// newest first.
    pub fn timeline(&self, user_id: UserId, limit: u32) -> warbler_types::Result<Vec<Message>> {
        self.with_conn(|conn| {
            collect_messages(
                conn,
                &format!(
                    "SELECT {MESSAGE_COLUMNS} FROM messages m
                     WHERE m.user_id = ?1
                        OR m.user_id IN (
                            SELECT user_being_followed_id FROM follows
                            WHERE user_following_id = ?1
                        )
                     ORDER BY m.timestamp DESC
                     LIMIT ?2"
                ),
                rusqlite::params![user_id.to_string(), limit],
            )
        })
    }
}
