use chrono::Utc;
use rusqlite::{params, OptionalExtension};
use uuid::Uuid;

use super::{exists, require, Database};
use crate::error::{EntityKind, Error, Result};
use crate::models::Session;

impl Database {
    /// Starts a session for the driver with its visit counter at zero.
    pub fn create_session(&self, driver_id: i64) -> Result<Session> {
        self.with_connection(|conn| {
            require(exists(conn, "driver", driver_id)?.then_some(()), EntityKind::Driver, driver_id)?;

            let session = Session {
                token: Uuid::new_v4(),
                driver_id,
                num_visits: 0,
                created_at: Utc::now(),
            };
            conn.execute(
                "INSERT INTO session (token, driver_id, num_visits, created_at) VALUES (?1, ?2, 0, ?3)",
                params![session.token, session.driver_id, session.created_at],
            )?;
            tracing::debug!(driver_id, "Started session");
            Ok(session)
        })
    }

    pub fn get_session(&self, token: Uuid) -> Result<Option<Session>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT token, driver_id, num_visits, created_at FROM session WHERE token = ?1",
                    [token],
                    |row| {
                        Ok(Session {
                            token: row.get(0)?,
                            driver_id: row.get(1)?,
                            num_visits: row.get(2)?,
                            created_at: row.get(3)?,
                        })
                    },
                )
                .optional()?)
        })
    }

    /// Returns whether a session was removed.
    pub fn delete_session(&self, token: Uuid) -> Result<bool> {
        self.with_connection(|conn| {
            let changed = conn.execute("DELETE FROM session WHERE token = ?1", [token])?;
            Ok(changed > 0)
        })
    }

    /// Bumps the session's visit counter and returns the new value.
    pub fn record_visit(&self, token: Uuid) -> Result<u32> {
        self.with_connection(|conn| {
            conn.query_row(
                "UPDATE session SET num_visits = num_visits + 1 WHERE token = ?1 RETURNING num_visits",
                [token],
                |row| row.get(0),
            )
            .optional()?
            .ok_or_else(|| Error::not_found(EntityKind::Session, token))
        })
    }
}
