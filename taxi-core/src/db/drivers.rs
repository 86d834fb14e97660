use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::cars::{car_with_manufacturer_from_row, CAR_WITH_MANUFACTURER_COLUMNS};
use super::{count, require, search_needle, Database};
use crate::error::{EntityKind, Result};
use crate::filter::FilterPredicate;
use crate::models::{CarWithManufacturer, CreateDriverInput, Driver, DriverDetail, UpdateLicenseInput};
use crate::pagination::{Page, PageRequest};
use crate::password::{hash_password, verify_password};

pub(crate) const DRIVER_COLUMNS: &str =
    "d.id, d.username, d.first_name, d.last_name, d.license_number, d.date_joined";

pub(crate) fn driver_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Driver> {
    Ok(Driver {
        id: row.get(offset)?,
        username: row.get(offset + 1)?,
        first_name: row.get(offset + 2)?,
        last_name: row.get(offset + 3)?,
        license_number: row.get(offset + 4)?,
        date_joined: row.get(offset + 5)?,
    })
}

fn find_driver(conn: &Connection, id: i64) -> Result<Option<Driver>> {
    let sql = format!("SELECT {} FROM driver d WHERE d.id = ?1", DRIVER_COLUMNS);
    Ok(conn
        .query_row(&sql, [id], |row| driver_from_row(row, 0))
        .optional()?)
}

fn cars_for_driver(conn: &Connection, driver_id: i64) -> Result<Vec<CarWithManufacturer>> {
    let sql = format!(
        "SELECT {} FROM car c
         JOIN manufacturer m ON m.id = c.manufacturer_id
         JOIN car_drivers cd ON cd.car_id = c.id
         WHERE cd.driver_id = ?1
         ORDER BY c.model, c.id",
        CAR_WITH_MANUFACTURER_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let cars = stmt
        .query_map([driver_id], car_with_manufacturer_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(cars)
}

impl Database {
    /// Validates the form, hashes the password and inserts the driver.
    ///
    /// A username or license number that is already taken fails with
    /// [`Error::ConstraintViolation`](crate::Error::ConstraintViolation).
    pub fn create_driver(&self, input: CreateDriverInput) -> Result<Driver> {
        let new = input.validate()?;
        let password_hash = hash_password(&new.password)?;
        let date_joined = Utc::now();

        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO driver (username, password_hash, first_name, last_name, license_number, date_joined)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    new.username,
                    password_hash,
                    new.first_name,
                    new.last_name,
                    new.license_number,
                    date_joined
                ],
            )?;
            let driver = Driver {
                id: conn.last_insert_rowid(),
                username: new.username,
                first_name: new.first_name,
                last_name: new.last_name,
                license_number: new.license_number,
                date_joined,
            };
            tracing::info!(id = driver.id, "Created driver {}", driver);
            Ok(driver)
        })
    }

    pub fn get_driver(&self, id: i64) -> Result<Option<Driver>> {
        self.with_connection(|conn| find_driver(conn, id))
    }

    /// The driver with every assigned car and that car's manufacturer.
    pub fn get_driver_detail(&self, id: i64) -> Result<Option<DriverDetail>> {
        self.with_connection(|conn| {
            let Some(driver) = find_driver(conn, id)? else {
                return Ok(None);
            };
            Ok(Some(DriverDetail {
                cars: cars_for_driver(conn, id)?,
                driver,
            }))
        })
    }

    pub fn update_driver_license(&self, id: i64, input: UpdateLicenseInput) -> Result<Driver> {
        let license_number = input.validate()?;
        self.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE driver SET license_number = ?1 WHERE id = ?2",
                params![license_number, id],
            )?;
            require((changed > 0).then_some(()), EntityKind::Driver, id)?;
            tracing::info!(id, "Updated license number");
            require(find_driver(conn, id)?, EntityKind::Driver, id)
        })
    }

    /// Also removes the driver's assignments and sessions.
    pub fn delete_driver(&self, id: i64) -> Result<()> {
        self.with_connection(|conn| {
            let changed = conn.execute("DELETE FROM driver WHERE id = ?1", [id])?;
            require((changed > 0).then_some(()), EntityKind::Driver, id)?;
            tracing::info!(id, "Deleted driver");
            Ok(())
        })
    }

    /// Ordered by username, filtered on `username`.
    pub fn list_drivers(&self, filter: &FilterPredicate, page: PageRequest) -> Result<Page<Driver>> {
        let needle = search_needle(filter, "username")?;
        self.with_connection(|conn| {
            let total = count(
                conn,
                "SELECT COUNT(*) FROM driver WHERE (?1 IS NULL OR icontains(username, ?1))",
                [needle],
            )?;
            let window = page.window(total, self.page_size)?;

            let sql = format!(
                "SELECT {} FROM driver d
                 WHERE (?1 IS NULL OR icontains(d.username, ?1))
                 ORDER BY d.username, d.id
                 LIMIT ?2 OFFSET ?3",
                DRIVER_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(
                    params![needle, i64::from(window.limit()), window.offset() as i64],
                    |row| driver_from_row(row, 0),
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(window.into_page(items))
        })
    }

    pub fn count_drivers(&self) -> Result<u64> {
        self.with_connection(|conn| count(conn, "SELECT COUNT(*) FROM driver", []))
    }

    /// `None` for an unknown username or a wrong password.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<Driver>> {
        let stored: Option<(i64, String)> = self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, password_hash FROM driver WHERE username = ?1",
                    [username],
                    |row| Ok((row.get(0)?, row.get(1)?)),
                )
                .optional()?)
        })?;

        let Some((id, password_hash)) = stored else {
            tracing::debug!(username, "Login for unknown username");
            return Ok(None);
        };
        if !verify_password(password, &password_hash)? {
            tracing::debug!(username, "Login with wrong password");
            return Ok(None);
        }
        self.get_driver(id)
    }
}
