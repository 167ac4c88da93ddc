use tracing::warn;
use warbler_types::models::UserId;
use warbler_types::{Result, WarblerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    PostMessage,
    DeleteMessage,
    Follow,
    Unfollow,
    ToggleLike,
    ViewFollowers,
    ViewFollowing,
    ViewLikes,
    ViewTimeline,
    EditProfile,
    DeleteAccount,
}

/// What an action is aimed at, reduced to the fields the policy reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    None,
    User(UserId),
    Message { owner: UserId },
}

/// Every action needs an acting identity. Deleting a message needs its
/// owner; editing or deleting an account needs that account. Viewing
/// anyone's followers, following or likes needs only a login.
pub fn can_act(acting: Option<UserId>, action: Action, target: Target) -> bool {
    let Some(acting) = acting else {
        return false;
    };

    match action {
        Action::DeleteMessage => matches!(target, Target::Message { owner } if owner == acting),
        Action::EditProfile | Action::DeleteAccount => {
            matches!(target, Target::User(id) if id == acting)
        }
        Action::PostMessage
        | Action::Follow
        | Action::Unfollow
        | Action::ToggleLike
        | Action::ViewFollowers
        | Action::ViewFollowing
        | Action::ViewLikes
        | Action::ViewTimeline => true,
    }
}

/// `can_act` as a `Result`, handing back the acting id on approval.
pub fn authorize(acting: Option<UserId>, action: Action, target: Target) -> Result<UserId> {
    match acting {
        Some(id) if can_act(acting, action, target) => Ok(id),
        _ => {
            warn!(acting = ?acting, ?action, ?target, "access denied");
            Err(WarblerError::Unauthorized)
        }
    }
}

/// Identity presence only, checked before a target is even looked up.
pub fn require_identity(acting: Option<UserId>) -> Result<UserId> {
    acting.ok_or_else(|| {
        warn!("access denied: no acting identity");
        WarblerError::Unauthorized
    })
}
