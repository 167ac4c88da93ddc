use rusqlite::{ErrorCode, ffi};
use warbler_types::WarblerError;

/// Map a failure from inside a connection closure onto the domain taxonomy.
///
/// A `WarblerError` raised by the closure passes through untouched. SQLite
/// uniqueness violations name the offending column; foreign-key violations
/// mean an endpoint is missing.
pub(crate) fn classify(err: anyhow::Error) -> WarblerError {
    let err = match err.downcast::<WarblerError>() {
        Ok(domain) => return domain,
        Err(err) => err,
    };

    if let Some(rusqlite::Error::SqliteFailure(failure, detail)) =
        err.downcast_ref::<rusqlite::Error>()
    {
        if failure.code == ErrorCode::ConstraintViolation {
            let detail = detail.as_deref().unwrap_or_default();
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return WarblerError::Uniqueness {
                        field: constrained_column(detail),
                    };
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return WarblerError::not_found("referenced row", detail);
                }
                _ => {}
            }
        }
    }

    WarblerError::Internal(err)
}

/// "UNIQUE constraint failed: users.email" -> "email"
fn constrained_column(detail: &str) -> String {
    detail
        .rsplit(':')
        .next()
        .and_then(|cols| cols.split(',').next())
        .map(|col| col.trim())
        .map(|col| col.rsplit('.').next().unwrap_or(col))
        .filter(|col| !col.is_empty())
        .unwrap_or("value")
        .to_string()
}
