use tracing::info;

use warbler_auth::policy::{self, Action, Target};
use warbler_db::Database;
use warbler_types::models::{Message, MessageId, User, UserId};
use warbler_types::{Result, WarblerError};

/// The acting user starts following `followee`. Following twice is a no-op.
pub fn follow(db: &Database, acting: Option<UserId>, followee: UserId) -> Result<bool> {
    let follower = policy::authorize(acting, Action::Follow, Target::User(followee))?;
    db.follow(follower, followee)
}

pub fn unfollow(db: &Database, acting: Option<UserId>, followee: UserId) -> Result<bool> {
    let follower = policy::authorize(acting, Action::Unfollow, Target::User(followee))?;
    db.unfollow(follower, followee)
}

/// Like the message, or unlike it if already liked. Returns whether it is
/// liked afterwards.
pub fn toggle_like(db: &Database, acting: Option<UserId>, message: MessageId) -> Result<bool> {
    let user = policy::authorize(acting, Action::ToggleLike, Target::None)?;
    let liked = db.toggle_like(user, message)?;
    info!(user_id = %user, message_id = %message, liked, "like toggled");
    Ok(liked)
}

/// Any logged-in user may list anyone's followers.
pub fn followers_of(db: &Database, acting: Option<UserId>, user: UserId) -> Result<Vec<User>> {
    policy::authorize(acting, Action::ViewFollowers, Target::User(user))?;
    ensure_user(db, user)?;
    db.followers(user)
}

pub fn following_of(db: &Database, acting: Option<UserId>, user: UserId) -> Result<Vec<User>> {
    policy::authorize(acting, Action::ViewFollowing, Target::User(user))?;
    ensure_user(db, user)?;
    db.following(user)
}

pub fn likes_of(db: &Database, acting: Option<UserId>, user: UserId) -> Result<Vec<Message>> {
    policy::authorize(acting, Action::ViewLikes, Target::User(user))?;
    ensure_user(db, user)?;
    db.liked_messages(user)
}

fn ensure_user(db: &Database, user: UserId) -> Result<()> {
    match db.get_user(user)? {
        Some(_) => Ok(()),
        None => Err(WarblerError::not_found("user", user)),
    }
}
