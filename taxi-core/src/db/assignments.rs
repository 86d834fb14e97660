use rusqlite::Connection;

use super::{exists, require, Database};
use crate::error::{EntityKind, Result};
use crate::models::AssignmentState;

fn current_state(conn: &Connection, driver_id: i64, car_id: i64) -> Result<AssignmentState> {
    let assigned: bool = conn.query_row(
        "SELECT EXISTS(SELECT 1 FROM car_drivers WHERE car_id = ?1 AND driver_id = ?2)",
        [car_id, driver_id],
        |row| row.get(0),
    )?;
    Ok(if assigned {
        AssignmentState::Assigned
    } else {
        AssignmentState::Unassigned
    })
}

impl Database {
    /// Flips the (driver, car) pair: removes it if present, adds it
    /// otherwise. Returns the state after the flip.
    ///
    /// The car is looked up first; a missing car or driver is
    /// [`Error::NotFound`](crate::Error::NotFound).
    pub fn toggle_assignment(&self, driver_id: i64, car_id: i64) -> Result<AssignmentState> {
        self.with_transaction(|tx| {
            require(exists(tx, "car", car_id)?.then_some(()), EntityKind::Car, car_id)?;
            require(exists(tx, "driver", driver_id)?.then_some(()), EntityKind::Driver, driver_id)?;

            let next = match current_state(tx, driver_id, car_id)? {
                AssignmentState::Assigned => {
                    tx.execute(
                        "DELETE FROM car_drivers WHERE car_id = ?1 AND driver_id = ?2",
                        [car_id, driver_id],
                    )?;
                    AssignmentState::Unassigned
                }
                AssignmentState::Unassigned => {
                    tx.execute(
                        "INSERT INTO car_drivers (car_id, driver_id) VALUES (?1, ?2)",
                        [car_id, driver_id],
                    )?;
                    AssignmentState::Assigned
                }
            };

            tracing::info!(driver_id, car_id, state = next.as_str(), "Toggled car assignment");
            Ok(next)
        })
    }

    pub fn assignment_state(&self, driver_id: i64, car_id: i64) -> Result<AssignmentState> {
        self.with_connection(|conn| current_state(conn, driver_id, car_id))
    }
}
