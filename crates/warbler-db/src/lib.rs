pub mod error;
pub mod migrations;
pub mod models;
pub mod queries;

use anyhow::Result;
use rusqlite::{Connection, TransactionBehavior};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};
use tracing::{info, warn};

use warbler_types::models::StoreCounts;

pub use queries::users::{NewUser, ProfileUpdate};

/// The Warbler store. One connection, shared by handle; callers inject it
/// into every operation instead of reaching for a global.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;

        // WAL mode for concurrent reads
        conn.pragma_update(None, "journal_mode", "WAL")?;
        let db = Self::prepare(conn)?;

        info!("Database opened at {}", path.display());
        Ok(db)
    }

    /// Private, throwaway store. Each call gets its own empty database.
    pub fn open_in_memory() -> Result<Self> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> Result<Self> {
        // Cascading deletes depend on this, and it is per-connection.
        conn.pragma_update(None, "foreign_keys", "ON")?;
        migrations::run(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| anyhow::anyhow!("DB lock poisoned: {}", e))
    }

    /// Run read-only work against the connection.
    pub fn with_conn<F, T>(&self, f: F) -> warbler_types::Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.lock()?;
        f(&conn).map_err(error::classify)
    }

    /// Run writes inside an IMMEDIATE transaction. The write lock is taken
    /// up front, so a read-then-write inside `f` cannot interleave with
    /// another writer. Commits only when `f` succeeds; otherwise the
    /// transaction rolls back on drop.
    pub fn with_tx<F, T>(&self, f: F) -> warbler_types::Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let mut conn = self.lock()?;
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| error::classify(e.into()))?;
        let out = f(&*tx).map_err(error::classify)?;
        tx.commit().map_err(|e| error::classify(e.into()))?;
        Ok(out)
    }

    pub fn counts(&self) -> warbler_types::Result<StoreCounts> {
        self.with_conn(|conn| {
            let counts = conn.query_row(
                "SELECT
                    (SELECT COUNT(*) FROM users),
                    (SELECT COUNT(*) FROM messages),
                    (SELECT COUNT(*) FROM follows),
                    (SELECT COUNT(*) FROM likes)",
                [],
                |row| {
                    Ok(StoreCounts {
                        users: row.get::<_, i64>(0)? as u64,
                        messages: row.get::<_, i64>(1)? as u64,
                        follows: row.get::<_, i64>(2)? as u64,
                        likes: row.get::<_, i64>(3)? as u64,
                    })
                },
            )?;
            Ok(counts)
        })
    }

    /// Empty every relation. Used to reset a store between test runs.
    pub fn delete_all(&self) -> warbler_types::Result<()> {
        self.with_tx(|conn| {
            conn.execute_batch(
                "DELETE FROM likes;
                 DELETE FROM follows;
                 DELETE FROM messages;
                 DELETE FROM users;",
            )?;
            Ok(())
        })?;
        warn!("All users, messages, follows and likes deleted");
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::testing;

    #[test]
    fn fresh_store_is_empty() {
        let db = testing::db();
        assert_eq!(db.counts().unwrap(), Default::default());
    }

    #[test]
    fn delete_all_clears_every_relation() {
        let db = testing::db();
        let a = testing::user(&db, "user1");
        let b = testing::user(&db, "user2");
        let msg = db.create_message(b.id, "user2 message", chrono::Utc::now()).unwrap();
        db.follow(a.id, b.id).unwrap();
        db.toggle_like(a.id, msg.id).unwrap();

        let before = db.counts().unwrap();
        assert_eq!((before.users, before.messages, before.follows, before.likes), (2, 1, 1, 1));

        db.delete_all().unwrap();
        assert_eq!(db.counts().unwrap(), Default::default());
    }

    #[test]
    fn migrations_are_idempotent() {
        let db = testing::db();
        db.with_conn(|conn| crate::migrations::run(conn)).unwrap();
        let version: i64 = db
            .with_conn(|conn| {
                Ok(conn.query_row("SELECT MAX(version) FROM schema_version", [], |r| r.get(0))?)
            })
            .unwrap();
        assert_eq!(version, crate::migrations::CURRENT_VERSION);
    }
}
