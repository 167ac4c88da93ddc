//! Request-scoped Warbler operations.
//!
//! Every function takes the store explicitly plus, where it matters, the
//! acting identity resolved by the caller. The policy is consulted before
//! any store is touched for writing.

pub mod content;
pub mod identity;
pub mod profiles;
pub mod relations;

pub use warbler_db::Database;
pub use warbler_types::{Result, WarblerError};

/// Home feed length when the caller has no preference.
pub const DEFAULT_TIMELINE_LIMIT: u32 = 100;
