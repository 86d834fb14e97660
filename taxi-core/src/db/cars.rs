use rusqlite::{params, Connection, OptionalExtension, Row};

use super::drivers::{driver_from_row, DRIVER_COLUMNS};
use super::manufacturers::manufacturer_from_row;
use super::{count, exists, require, search_needle, Database};
use crate::error::{EntityKind, Error, Result};
use crate::filter::FilterPredicate;
use crate::models::{Car, CarDetail, CarInput, CarWithManufacturer, Driver};
use crate::pagination::{Page, PageRequest};
use crate::validation::{ValidationErrors, INVALID_CHOICE};

/// Car columns followed by its manufacturer's, for `car_with_manufacturer_from_row`.
pub(crate) const CAR_WITH_MANUFACTURER_COLUMNS: &str =
    "c.id, c.model, c.manufacturer_id, m.id, m.name, m.country";

pub(crate) fn car_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Car> {
    Ok(Car {
        id: row.get(offset)?,
        model: row.get(offset + 1)?,
        manufacturer_id: row.get(offset + 2)?,
    })
}

pub(crate) fn car_with_manufacturer_from_row(row: &Row<'_>) -> rusqlite::Result<CarWithManufacturer> {
    Ok(CarWithManufacturer {
        car: car_from_row(row, 0)?,
        manufacturer: manufacturer_from_row(row, 3)?,
    })
}

/// Reports a missing manufacturer or driver as a field error.
fn check_references(conn: &Connection, input: &CarInput) -> Result<i64> {
    let mut errors = ValidationErrors::new();

    let manufacturer_id = match input.manufacturer_id {
        Some(id) if exists(conn, "manufacturer", id)? => id,
        _ => {
            errors.add("manufacturer", INVALID_CHOICE);
            0
        }
    };
    for &driver_id in &input.driver_ids {
        if !exists(conn, "driver", driver_id)? {
            errors.add(
                "drivers",
                format!("{} {} is not one of the available choices.", INVALID_CHOICE, driver_id),
            );
        }
    }

    if errors.is_empty() {
        Ok(manufacturer_id)
    } else {
        Err(Error::Validation(errors))
    }
}

fn replace_drivers(conn: &Connection, car_id: i64, driver_ids: &[i64]) -> Result<()> {
    conn.execute("DELETE FROM car_drivers WHERE car_id = ?1", [car_id])?;
    let mut stmt = conn.prepare("INSERT INTO car_drivers (car_id, driver_id) VALUES (?1, ?2)")?;
    for &driver_id in driver_ids {
        stmt.execute([car_id, driver_id])?;
    }
    Ok(())
}

pub(crate) fn drivers_for_car(conn: &Connection, car_id: i64) -> Result<Vec<Driver>> {
    let sql = format!(
        "SELECT {} FROM driver d
         JOIN car_drivers cd ON cd.driver_id = d.id
         WHERE cd.car_id = ?1
         ORDER BY d.username, d.id",
        DRIVER_COLUMNS
    );
    let mut stmt = conn.prepare(&sql)?;
    let drivers = stmt
        .query_map([car_id], |row| driver_from_row(row, 0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(drivers)
}

impl Database {
    /// Creates the car and assigns it to `input.driver_ids`.
    pub fn create_car(&self, input: CarInput) -> Result<Car> {
        let input = input.validate()?;
        self.with_transaction(|tx| {
            let manufacturer_id = check_references(tx, &input)?;
            tx.execute(
                "INSERT INTO car (model, manufacturer_id) VALUES (?1, ?2)",
                params![input.model, manufacturer_id],
            )?;
            let car = Car {
                id: tx.last_insert_rowid(),
                model: input.model,
                manufacturer_id,
            };
            replace_drivers(tx, car.id, &input.driver_ids)?;

            tracing::info!(id = car.id, "Created car {}", car);
            Ok(car)
        })
    }

    pub fn get_car(&self, id: i64) -> Result<Option<Car>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, model, manufacturer_id FROM car WHERE id = ?1",
                    [id],
                    |row| car_from_row(row, 0),
                )
                .optional()?)
        })
    }

    /// The car with its manufacturer and assigned drivers.
    pub fn get_car_detail(&self, id: i64) -> Result<Option<CarDetail>> {
        self.with_connection(|conn| {
            let sql = format!(
                "SELECT {} FROM car c JOIN manufacturer m ON m.id = c.manufacturer_id WHERE c.id = ?1",
                CAR_WITH_MANUFACTURER_COLUMNS
            );
            let Some(row) = conn
                .query_row(&sql, [id], car_with_manufacturer_from_row)
                .optional()?
            else {
                return Ok(None);
            };

            Ok(Some(CarDetail {
                drivers: drivers_for_car(conn, id)?,
                car: row.car,
                manufacturer: row.manufacturer,
            }))
        })
    }

    /// Replaces the model, manufacturer and the full set of assigned drivers.
    pub fn update_car(&self, id: i64, input: CarInput) -> Result<Car> {
        let input = input.validate()?;
        self.with_transaction(|tx| {
            require(exists(tx, "car", id)?.then_some(()), EntityKind::Car, id)?;
            let manufacturer_id = check_references(tx, &input)?;
            tx.execute(
                "UPDATE car SET model = ?1, manufacturer_id = ?2 WHERE id = ?3",
                params![input.model, manufacturer_id, id],
            )?;
            replace_drivers(tx, id, &input.driver_ids)?;

            Ok(Car {
                id,
                model: input.model,
                manufacturer_id,
            })
        })
    }

    pub fn delete_car(&self, id: i64) -> Result<()> {
        self.with_connection(|conn| {
            let changed = conn.execute("DELETE FROM car WHERE id = ?1", [id])?;
            require((changed > 0).then_some(()), EntityKind::Car, id)?;
            tracing::info!(id, "Deleted car");
            Ok(())
        })
    }

    /// Ordered by model, filtered on `model`.
    pub fn list_cars(
        &self,
        filter: &FilterPredicate,
        page: PageRequest,
    ) -> Result<Page<CarWithManufacturer>> {
        let needle = search_needle(filter, "model")?;
        self.with_connection(|conn| {
            let total = count(
                conn,
                "SELECT COUNT(*) FROM car WHERE (?1 IS NULL OR icontains(model, ?1))",
                [needle],
            )?;
            let window = page.window(total, self.page_size)?;

            let sql = format!(
                "SELECT {} FROM car c
                 JOIN manufacturer m ON m.id = c.manufacturer_id
                 WHERE (?1 IS NULL OR icontains(c.model, ?1))
                 ORDER BY c.model, c.id
                 LIMIT ?2 OFFSET ?3",
                CAR_WITH_MANUFACTURER_COLUMNS
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(
                    params![needle, i64::from(window.limit()), window.offset() as i64],
                    car_with_manufacturer_from_row,
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(window.into_page(items))
        })
    }

    pub fn count_cars(&self) -> Result<u64> {
        self.with_connection(|conn| count(conn, "SELECT COUNT(*) FROM car", []))
    }
}
