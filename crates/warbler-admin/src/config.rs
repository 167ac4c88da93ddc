use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminConfig {
    pub db_path: PathBuf,
    pub log_filter: String,
}

impl AdminConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            db_path: lookup("WARBLER_DB_PATH")
                .unwrap_or_else(|| "warbler.db".into())
                .into(),
            log_filter: lookup("RUST_LOG")
                .unwrap_or_else(|| "warbler=debug,warbler_db=info".into()),
        }
    }
}
