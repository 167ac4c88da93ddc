use thiserror::Error;

pub type Result<T> = std::result::Result<T, WarblerError>;

/// Failures surfaced by every store and service operation.
#[derive(Debug, Error)]
pub enum WarblerError {
    #[error("{field}: {reason}")]
    Validation { field: &'static str, reason: String },

    #[error("{field} already taken")]
    Uniqueness { field: String },

    /// Uniform denial text; it never says whether the target exists.
    #[error("Access unauthorized.")]
    Unauthorized,

    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl WarblerError {
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Not-found outcomes that callers may treat as a no-op.
    pub fn is_benign(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unauthorized_uses_uniform_message() {
        assert_eq!(WarblerError::Unauthorized.to_string(), "Access unauthorized.");
    }

    #[test]
    fn only_not_found_is_benign() {
        assert!(WarblerError::not_found("message", 1234).is_benign());
        assert!(!WarblerError::Unauthorized.is_benign());
        assert!(!WarblerError::validation("text", "required").is_benign());
    }
}
