use tracing::{debug, info};

use super::{collect_users, user_exists};
use crate::Database;
use crate::models::USER_COLUMNS;
use warbler_types::WarblerError;
use warbler_types::models::{User, UserId};

impl Database {
    // -- Relationship store: follows --

    /// Adds the edge `follower -> followee`. Following twice is a no-op;
    /// returns whether a new edge was inserted.
    pub fn follow(&self, follower: UserId, followee: UserId) -> warbler_types::Result<bool> {
        if follower == followee {
            return Err(WarblerError::validation("user", "Users cannot follow themselves."));
        }

        let inserted = self.with_tx(|conn| {
            for id in [follower, followee] {
                if !user_exists(conn, id)? {
                    return Err(WarblerError::not_found("user", id).into());
                }
            }
            Ok(conn.execute(
                "INSERT OR IGNORE INTO follows (user_being_followed_id, user_following_id)
                 VALUES (?1, ?2)",
                [followee.to_string(), follower.to_string()],
            )? > 0)
        })?;

        if inserted {
            info!(%follower, %followee, "follow added");
        } else {
            debug!(%follower, %followee, "already following");
        }
        Ok(inserted)
    }

    /// Removes the edge if present; returns whether one was removed.
    pub fn unfollow(&self, follower: UserId, followee: UserId) -> warbler_types::Result<bool> {
        let removed = self.with_tx(|conn| {
            Ok(conn.execute(
                "DELETE FROM follows WHERE user_being_followed_id = ?1 AND user_following_id = ?2",
                [followee.to_string(), follower.to_string()],
            )? > 0)
        })?;
        if removed {
            info!(%follower, %followee, "follow removed");
        }
        Ok(removed)
    }

    /// Does `user` follow `other`?
    pub fn is_following(&self, user: UserId, other: UserId) -> warbler_types::Result<bool> {
        self.with_conn(|conn| {
            let count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM follows
                 WHERE user_being_followed_id = ?1 AND user_following_id = ?2",
                [other.to_string(), user.to_string()],
                |row| row.get(0),
            )?;
            Ok(count > 0)
        })
    }

    /// Is `user` followed by `other`?
    pub fn is_followed_by(&self, user: UserId, other: UserId) -> warbler_types::Result<bool> {
        self.is_following(other, user)
    }

    /// Users following `user`, by username.
    pub fn followers(&self, user: UserId) -> warbler_types::Result<Vec<User>> {
        self.with_conn(|conn| {
            collect_users(
                conn,
                &format!(
                    "SELECT {USER_COLUMNS} FROM users u
                     JOIN follows f ON f.user_following_id = u.id
                     WHERE f.user_being_followed_id = ?1
                     ORDER BY u.username"
                ),
                [user.to_string()],
            )
        })
    }

    /// Users `user` follows, by username.
    pub fn following(&self, user: UserId) -> warbler_types::Result<Vec<User>> {
        self.with_conn(|conn| {
            collect_users(
                conn,
                &format!(
                    "SELECT {USER_COLUMNS} FROM users u
                     JOIN follows f ON f.user_being_followed_id = u.id
                     WHERE f.user_following_id = ?1
                     ORDER BY u.username"
                ),
                [user.to_string()],
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing;
    use uuid::Uuid;

    #[test]
    fn follow_and_unfollow_round_trip() {
        let db = testing::db();
        let u1 = testing::user(&db, "testuser");
        let u2 = testing::user(&db, "testuser2");

        assert!(!db.is_following(u1.id, u2.id).unwrap());
        assert!(!db.is_followed_by(u2.id, u1.id).unwrap());

        assert!(db.follow(u1.id, u2.id).unwrap());
        assert!(db.is_following(u1.id, u2.id).unwrap());
        assert!(db.is_followed_by(u2.id, u1.id).unwrap());
        assert!(!db.is_following(u2.id, u1.id).unwrap());

        assert!(db.unfollow(u1.id, u2.id).unwrap());
        assert!(!db.is_following(u1.id, u2.id).unwrap());
        assert!(!db.is_followed_by(u2.id, u1.id).unwrap());
        assert!(!db.unfollow(u1.id, u2.id).unwrap());
    }

    #[test]
    fn duplicate_follow_is_idempotent() {
        let db = testing::db();
        let u1 = testing::user(&db, "user1");
        let u2 = testing::user(&db, "user2");
        assert!(db.follow(u1.id, u2.id).unwrap());
        assert!(!db.follow(u1.id, u2.id).unwrap());
        assert_eq!(db.counts().unwrap().follows, 1);
    }

    #[test]
    fn self_and_unknown_follows_are_rejected() {
        let db = testing::db();
        let u1 = testing::user(&db, "user1");
        assert!(matches!(
            db.follow(u1.id, u1.id).unwrap_err(),
            WarblerError::Validation { .. }
        ));
        assert!(db.follow(u1.id, Uuid::new_v4()).unwrap_err().is_benign());
        assert_eq!(db.counts().unwrap().follows, 0);
    }

    #[test]
    fn lists_followers_and_following() {
        let db = testing::db();
        let u1 = testing::user(&db, "user1");
        let u2 = testing::user(&db, "user2");
        let u3 = testing::user(&db, "user3");
        let u4 = testing::user(&db, "abcde");
        db.follow(u2.id, u1.id).unwrap();
        db.follow(u3.id, u1.id).unwrap();
        db.follow(u1.id, u4.id).unwrap();

        let names = |users: Vec<User>| users.into_iter().map(|u| u.username).collect::<Vec<_>>();
        assert_eq!(names(db.followers(u1.id).unwrap()), ["user2", "user3"]);
        assert_eq!(names(db.following(u1.id).unwrap()), ["abcde"]);
        assert!(db.followers(u4.id).unwrap().iter().any(|u| u.id == u1.id));
    }
}
