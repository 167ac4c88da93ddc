/// Warbler identity and permission primitives.
///
/// `password` owns the salted one-way hashing of credentials; `policy` holds
/// the pure decisions about what an acting identity may do.
pub mod password;
pub mod policy;
