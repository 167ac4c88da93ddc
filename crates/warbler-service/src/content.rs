use chrono::Utc;
use tracing::debug;

use warbler_auth::policy::{self, Action, Target};
use warbler_db::Database;
use warbler_types::forms::MessageForm;
use warbler_types::models::{Message, MessageId, UserId};
use warbler_types::{Result, WarblerError};

/// Post a message as the acting user, stamped with the current time.
pub fn create_message(db: &Database, acting: Option<UserId>, mut form: MessageForm) -> Result<Message> {
    let user_id = policy::authorize(acting, Action::PostMessage, Target::None)?;
    form.validate()?;
    db.create_message(user_id, &form.text, Utc::now())
}

pub fn show_message(db: &Database, id: MessageId) -> Result<Message> {
    db.get_message(id)?
        .ok_or_else(|| WarblerError::not_found("message", id))
}

/// Anonymous callers are turned away before the message is looked up. A
/// message that is already gone is a no-op (`Ok(false)`); someone else's
/// message is `Unauthorized`.
pub fn delete_message(db: &Database, acting: Option<UserId>, id: MessageId) -> Result<bool> {
    policy::require_identity(acting)?;

    let Some(message) = db.get_message(id)? else {
        debug!(message_id = %id, "delete_message: already gone");
        return Ok(false);
    };

    let owner = policy::authorize(
        acting,
        Action::DeleteMessage,
        Target::Message {
            owner: message.user_id,
        },
    )?;
    db.delete_owned_message(id, owner)
}

/// The acting user's home feed.
pub fn timeline(db: &Database, acting: Option<UserId>, limit: u32) -> Result<Vec<Message>> {
    let user_id = policy::authorize(acting, Action::ViewTimeline, Target::None)?;
    db.timeline(user_id, limit)
}
