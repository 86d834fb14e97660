use rusqlite::{params, OptionalExtension, Row};

use super::{count, require, search_needle, Database};
use crate::error::{EntityKind, Result};
use crate::filter::FilterPredicate;
use crate::models::{Manufacturer, ManufacturerInput};
use crate::pagination::{Page, PageRequest};

pub(crate) fn manufacturer_from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Manufacturer> {
    Ok(Manufacturer {
        id: row.get(offset)?,
        name: row.get(offset + 1)?,
        country: row.get(offset + 2)?,
    })
}

impl Database {
    pub fn create_manufacturer(&self, input: ManufacturerInput) -> Result<Manufacturer> {
        let input = input.validate()?;
        self.with_connection(|conn| {
            conn.execute(
                "INSERT INTO manufacturer (name, country) VALUES (?1, ?2)",
                params![input.name, input.country],
            )?;
            let manufacturer = Manufacturer {
                id: conn.last_insert_rowid(),
                name: input.name,
                country: input.country,
            };
            tracing::info!(id = manufacturer.id, "Created manufacturer {}", manufacturer);
            Ok(manufacturer)
        })
    }

    pub fn get_manufacturer(&self, id: i64) -> Result<Option<Manufacturer>> {
        self.with_connection(|conn| {
            Ok(conn
                .query_row(
                    "SELECT id, name, country FROM manufacturer WHERE id = ?1",
                    [id],
                    |row| manufacturer_from_row(row, 0),
                )
                .optional()?)
        })
    }

    pub fn update_manufacturer(&self, id: i64, input: ManufacturerInput) -> Result<Manufacturer> {
        let input = input.validate()?;
        self.with_connection(|conn| {
            let changed = conn.execute(
                "UPDATE manufacturer SET name = ?1, country = ?2 WHERE id = ?3",
                params![input.name, input.country, id],
            )?;
            require((changed > 0).then_some(()), EntityKind::Manufacturer, id)?;
            Ok(Manufacturer {
                id,
                name: input.name,
                country: input.country,
            })
        })
    }

    /// Also deletes the manufacturer's cars and their assignments.
    pub fn delete_manufacturer(&self, id: i64) -> Result<()> {
        self.with_connection(|conn| {
            let changed = conn.execute("DELETE FROM manufacturer WHERE id = ?1", [id])?;
            require((changed > 0).then_some(()), EntityKind::Manufacturer, id)?;
            tracing::info!(id, "Deleted manufacturer");
            Ok(())
        })
    }

    /// Ordered by name, filtered on `name`.
    pub fn list_manufacturers(
        &self,
        filter: &FilterPredicate,
        page: PageRequest,
    ) -> Result<Page<Manufacturer>> {
        let needle = search_needle(filter, "name")?;
        self.with_connection(|conn| {
            let total = count(
                conn,
                "SELECT COUNT(*) FROM manufacturer WHERE (?1 IS NULL OR icontains(name, ?1))",
                [needle],
            )?;
            let window = page.window(total, self.page_size)?;

            let mut stmt = conn.prepare(
                "SELECT id, name, country FROM manufacturer
                 WHERE (?1 IS NULL OR icontains(name, ?1))
                 ORDER BY name, id
                 LIMIT ?2 OFFSET ?3",
            )?;
            let items = stmt
                .query_map(
                    params![needle, i64::from(window.limit()), window.offset() as i64],
                    |row| manufacturer_from_row(row, 0),
                )?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            Ok(window.into_page(items))
        })
    }

    /// Every manufacturer, for populating car forms.
    pub fn all_manufacturers(&self) -> Result<Vec<Manufacturer>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT id, name, country FROM manufacturer ORDER BY name, id")?;
            let items = stmt
                .query_map([], |row| manufacturer_from_row(row, 0))?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(items)
        })
    }

    pub fn count_manufacturers(&self) -> Result<u64> {
        self.with_connection(|conn| count(conn, "SELECT COUNT(*) FROM manufacturer", []))
    }
}
