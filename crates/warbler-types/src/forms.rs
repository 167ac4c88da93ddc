//! Posted input for signup, login, profile edit and message composition.
//!
//! `validate` trims every field in place before checking it, so a caller can
//! hand the form straight to the store afterwards.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Deserialize;

use crate::error::{Result, WarblerError};

pub const MIN_PASSWORD_LEN: usize = 6;
pub const MAX_MESSAGE_LEN: usize = 140;

pub fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

/// Trims an optional field; blank becomes `None`.
fn trim_optional(value: &mut Option<String>) {
    if let Some(v) = value.as_mut() {
        trim_in_place(v);
    }
    if value.as_deref().is_some_and(str::is_empty) {
        *value = None;
    }
}

fn require(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(WarblerError::validation(field, "This field is required."));
    }
    Ok(())
}

fn require_email(value: &str) -> Result<()> {
    require("email", value)?;
    if !is_valid_email(value) {
        return Err(WarblerError::validation("email", "Invalid email address."));
    }
    Ok(())
}

fn require_password_len(value: &str) -> Result<()> {
    if value.chars().count() < MIN_PASSWORD_LEN {
        return Err(WarblerError::validation(
            "password",
            format!("Field must be at least {MIN_PASSWORD_LEN} characters long."),
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl SignupForm {
    pub fn validate(&mut self) -> Result<()> {
        trim_in_place(&mut self.username);
        trim_in_place(&mut self.email);
        trim_optional(&mut self.image_url);

        require("username", &self.username)?;
        require_email(&self.email)?;
        require("password", &self.password)?;
        require_password_len(&self.password)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

impl LoginForm {
    pub fn validate(&mut self) -> Result<()> {
        trim_in_place(&mut self.username);
        require("username", &self.username)?;
        require_password_len(&self.password)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileEditForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub header_image_url: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    /// Current password, re-checked before the edit is applied.
    #[serde(default)]
    pub password: String,
}

impl ProfileEditForm {
    pub fn validate(&mut self) -> Result<()> {
        trim_in_place(&mut self.username);
        trim_in_place(&mut self.email);
        trim_optional(&mut self.image_url);
        trim_optional(&mut self.header_image_url);
        trim_optional(&mut self.bio);

        require("username", &self.username)?;
        require_email(&self.email)?;
        require("password", &self.password)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageForm {
    #[serde(default)]
    pub text: String,
}

impl MessageForm {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn validate(&mut self) -> Result<()> {
        trim_in_place(&mut self.text);
        require("text", &self.text)?;
        if self.text.chars().count() > MAX_MESSAGE_LEN {
            return Err(WarblerError::validation(
                "text",
                format!("Field cannot be longer than {MAX_MESSAGE_LEN} characters."),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signup() -> SignupForm {
        SignupForm {
            username: "testuser3".into(),
            email: "test3@test.com".into(),
            password: "HASHED_PASSWORD3".into(),
            image_url: None,
        }
    }

    fn field_of(err: WarblerError) -> &'static str {
        match err {
            WarblerError::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_valid_signup_and_trims() {
        let mut form = signup();
        form.username = "  testuser3 ".into();
        form.image_url = Some("   ".into());
        form.validate().unwrap();
        assert_eq!(form.username, "testuser3");
        assert_eq!(form.image_url, None);
    }

    #[test]
    fn missing_username_is_a_validation_error() {
        let mut form = signup();
        form.username.clear();
        assert_eq!(field_of(form.validate().unwrap_err()), "username");
    }

    #[test]
    fn rejects_malformed_email() {
        let mut form = signup();
        form.email = "not-an-email".into();
        assert_eq!(field_of(form.validate().unwrap_err()), "email");
    }

    #[test]
    fn rejects_short_password() {
        let mut form = signup();
        form.password = "abc".into();
        assert_eq!(field_of(form.validate().unwrap_err()), "password");
    }

    #[test]
    fn signup_deserializes_with_missing_fields() {
        let mut form: SignupForm =
            serde_json::from_str(r#"{"email":"a@b.com","password":"secret1"}"#).unwrap();
        assert_eq!(field_of(form.validate().unwrap_err()), "username");
    }

    #[test]
    fn message_text_is_required_and_bounded() {
        let mut empty = MessageForm::new("   ");
        assert_eq!(field_of(empty.validate().unwrap_err()), "text");

        let mut long = MessageForm::new("x".repeat(MAX_MESSAGE_LEN + 1));
        assert_eq!(field_of(long.validate().unwrap_err()), "text");

        let mut exact = MessageForm::new("x".repeat(MAX_MESSAGE_LEN));
        assert!(exact.validate().is_ok());
    }

    #[test]
    fn profile_edit_requires_password() {
        let mut form = ProfileEditForm {
            username: "user1".into(),
            email: "user1@test.com".into(),
            bio: Some("  ".into()),
            ..Default::default()
        };
        assert_eq!(field_of(form.validate().unwrap_err()), "password");
        assert_eq!(form.bio, None);
    }

    #[test]
    fn login_checks_username_and_password_length() {
        let mut form = LoginForm {
            username: "".into(),
            password: "password".into(),
        };
        assert_eq!(field_of(form.validate().unwrap_err()), "username");

        form.username = "user1".into();
        form.password = "pw".into();
        assert_eq!(field_of(form.validate().unwrap_err()), "password");
    }
}
