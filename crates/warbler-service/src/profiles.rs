use serde::Serialize;

use warbler_db::Database;
use warbler_types::models::{Message, ProfileSummary, User, UserId};
use warbler_types::{Result, WarblerError};

/// What a profile page shows: counters plus the latest messages.
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePage {
    pub summary: ProfileSummary,
    pub messages: Vec<Message>,
}

/// Public directory, optionally narrowed by a username search.
pub fn list_users(db: &Database, search: Option<&str>) -> Result<Vec<User>> {
    db.list_users(search)
}

/// Public profile of any user.
pub fn show_user(db: &Database, user: UserId, limit: u32) -> Result<ProfilePage> {
    let summary = db
        .profile_summary(user)?
        .ok_or_else(|| WarblerError::not_found("user", user))?;
    let messages = db.messages_by_user(user, limit)?;
    Ok(ProfilePage { summary, messages })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::create_message;
    use crate::identity::signup;
    use warbler_types::forms::{MessageForm, SignupForm};

    #[test]
    fn profile_page_shows_counts_and_messages() {
        let db = Database::open_in_memory().unwrap();
        let user = signup(
            &db,
            SignupForm {
                username: "user1".into(),
                email: "user1@test.com".into(),
                password: "password".into(),
                image_url: None,
            },
        )
        .unwrap();
        create_message(&db, Some(user.id), MessageForm::new("first")).unwrap();
        create_message(&db, Some(user.id), MessageForm::new("second")).unwrap();

        let page = show_user(&db, user.id, 100).unwrap();
        assert_eq!(page.summary.user.username, "user1");
        assert_eq!(page.summary.messages, 2);
        assert_eq!(page.messages.len(), 2);

        assert!(show_user(&db, uuid::Uuid::new_v4(), 100).unwrap_err().is_benign());
    }
}
