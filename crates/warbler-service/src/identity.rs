use tracing::{info, warn};

use warbler_auth::password::{hash_password, verify_password};
use warbler_auth::policy::{self, Action, Target};
use warbler_db::{Database, NewUser, ProfileUpdate};
use warbler_types::forms::{LoginForm, ProfileEditForm, SignupForm};
use warbler_types::models::{User, UserId};
use warbler_types::{Result, WarblerError};

/// Validate, hash the password, store. A taken username or email comes back
/// as `Uniqueness` from the insert itself.
pub fn signup(db: &Database, mut form: SignupForm) -> Result<User> {
    form.validate()?;

    let password_hash = hash_password(&form.password)?;
    db.create_user(&NewUser {
        username: &form.username,
        email: &form.email,
        password_hash: &password_hash,
        image_url: form.image_url.as_deref(),
    })
}

/// `None` for an unknown username or a wrong password. Neither is an error.
pub fn authenticate(db: &Database, username: &str, password: &str) -> Result<Option<User>> {
    let Some(user) = db.get_user_by_username(username)? else {
        warn!(%username, "login failed: unknown user");
        return Ok(None);
    };

    if verify_password(password, &user.password)? {
        info!(user_id = %user.id, "login succeeded");
        Ok(Some(user))
    } else {
        warn!(user_id = %user.id, "login failed: wrong password");
        Ok(None)
    }
}

pub fn login(db: &Database, mut form: LoginForm) -> Result<Option<User>> {
    form.validate()?;
    authenticate(db, &form.username, &form.password)
}

/// Edit the profile of `target`, which must be the acting user. The current
/// password must match.
pub fn edit_profile(
    db: &Database,
    acting: Option<UserId>,
    target: UserId,
    mut form: ProfileEditForm,
) -> Result<User> {
    let user_id = policy::authorize(acting, Action::EditProfile, Target::User(target))?;
    form.validate()?;

    let user = db
        .get_user(user_id)?
        .ok_or_else(|| WarblerError::not_found("user", user_id))?;
    if !verify_password(&form.password, &user.password)? {
        warn!(%user_id, "profile edit rejected: wrong password");
        return Err(WarblerError::validation("password", "Wrong password, please try again."));
    }

    db.update_user(
        user_id,
        &ProfileUpdate {
            username: &form.username,
            email: &form.email,
            image_url: form.image_url.as_deref(),
            header_image_url: form.header_image_url.as_deref(),
            bio: form.bio.as_deref(),
        },
    )
}

/// Delete `target` along with everything that references them. Only the
/// account owner may do this.
pub fn delete_account(db: &Database, acting: Option<UserId>, target: UserId) -> Result<()> {
    let user_id = policy::authorize(acting, Action::DeleteAccount, Target::User(target))?;
    db.delete_user(user_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn db() -> Database {
        Database::open_in_memory().unwrap()
    }

    fn form(username: &str, email: &str, password: &str) -> SignupForm {
        SignupForm {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            image_url: None,
        }
    }

    #[test]
    fn signup_stores_only_the_hash() {
        let db = db();
        let user = signup(
            &db,
            SignupForm {
                image_url: Some("https://www.petmd.com/dog.jpg".into()),
                ..form("testuser3", "test3@test.com", "HASHED_PASSWORD3")
            },
        )
        .unwrap();

        assert_ne!(user.password, "HASHED_PASSWORD3");
        assert_eq!(user.image_url, "https://www.petmd.com/dog.jpg");
        let stored = db.get_user(user.id).unwrap().unwrap();
        assert_eq!(stored.password, user.password);
    }

    #[test]
    fn signup_without_username_is_a_validation_error() {
        let db = db();
        let err = signup(&db, form("", "test3@test.com", "HASHED_PASSWORD3")).unwrap_err();
        assert!(matches!(err, WarblerError::Validation { field: "username", .. }));
        assert_eq!(db.counts().unwrap().users, 0);
    }

    #[test]
    fn signup_with_taken_email_is_a_uniqueness_error() {
        let db = db();
        signup(&db, form("user1", "user1@test.com", "password")).unwrap();
        let err = signup(&db, form("user2", "user1@test.com", "password")).unwrap_err();
        assert!(matches!(err, WarblerError::Uniqueness { ref field } if field == "email"));
    }

    #[test]
    fn authenticate_only_matches_right_credentials() {
        let db = db();
        let user = signup(&db, form("testuser3", "test3@test.com", "HASHED_PASSWORD3")).unwrap();

        assert!(authenticate(&db, "testuser7", "HASHED_PASSWORD3").unwrap().is_none());
        assert!(authenticate(&db, "testuser3", "HASHED_PASSWORD2").unwrap().is_none());
        assert_eq!(
            authenticate(&db, "testuser3", "HASHED_PASSWORD3").unwrap().map(|u| u.id),
            Some(user.id)
        );
    }

    #[test]
    fn login_validates_before_looking_up() {
        let db = db();
        let err = login(
            &db,
            LoginForm {
                username: "user1".into(),
                password: "short".into(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, WarblerError::Validation { field: "password", .. }));
    }

    #[test]
    fn edit_profile_requires_login_and_current_password() {
        let db = db();
        let user = signup(&db, form("user1", "user1@test.com", "password")).unwrap();
        let edit = |password: &str| ProfileEditForm {
            username: "user1-renamed".into(),
            email: "user1@test.com".into(),
            bio: Some("warbling".into()),
            password: password.into(),
            ..Default::default()
        };

        assert!(matches!(
            edit_profile(&db, None, user.id, edit("password")).unwrap_err(),
            WarblerError::Unauthorized
        ));
        assert!(matches!(
            edit_profile(&db, Some(user.id), user.id, edit("nope")).unwrap_err(),
            WarblerError::Validation { field: "password", .. }
        ));

        let updated = edit_profile(&db, Some(user.id), user.id, edit("password")).unwrap();
        assert_eq!(updated.username, "user1-renamed");
        assert_eq!(updated.bio.as_deref(), Some("warbling"));
        assert!(authenticate(&db, "user1-renamed", "password").unwrap().is_some());
    }

    #[test]
    fn delete_account_removes_acting_user() {
        let db = db();
        let user = signup(&db, form("user1", "user1@test.com", "password")).unwrap();
        assert!(matches!(
            delete_account(&db, None, user.id).unwrap_err(),
            WarblerError::Unauthorized
        ));
        delete_account(&db, Some(user.id), user.id).unwrap();
        assert!(db.get_user(user.id).unwrap().is_none());
    }

    #[test]
    fn cannot_edit_or_delete_someone_elses_account() {
        let db = db();
        let owner = signup(&db, form("user1", "user1@test.com", "password")).unwrap();
        let other = signup(&db, form("user2", "user2@test.com", "password")).unwrap();

        // Even with the owner's password, another user is turned away.
        let err = edit_profile(
            &db,
            Some(other.id),
            owner.id,
            ProfileEditForm {
                username: "hijacked".into(),
                email: "user1@test.com".into(),
                password: "password".into(),
                ..Default::default()
            },
        )
        .unwrap_err();
        assert!(matches!(err, WarblerError::Unauthorized));
        assert_eq!(db.get_user(owner.id).unwrap().unwrap().username, "user1");

        let err = delete_account(&db, Some(other.id), owner.id).unwrap_err();
        assert!(matches!(err, WarblerError::Unauthorized));
        assert_eq!(db.counts().unwrap().users, 2);
    }
}
