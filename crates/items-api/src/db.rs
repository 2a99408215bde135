//! SQLite storage for items.

use std::path::Path;
use std::sync::{Arc, Mutex};

use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("lock poisoned")]
    LockPoisoned,
}

/// A stored item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

/// Payload for creating an item.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateItem {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: f64,
}

/// Partial update: absent fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateItem {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
}

#[derive(Clone)]
pub struct Db {
    conn: Arc<Mutex<Connection>>,
}

fn row_to_item(row: &Row) -> rusqlite::Result<Item> {
    Ok(Item {
        id: row.get("id")?,
        name: row.get("name")?,
        description: row.get("description")?,
        price: row.get("price")?,
    })
}

impl Db {
    pub fn open(path: &Path) -> Result<Self, DbError> {
        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA journal_mode=WAL;
             PRAGMA busy_timeout=5000;",
        )?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.migrate()?;
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.migrate()?;
        Ok(db)
    }

    fn with_conn<F, T>(&self, f: F) -> Result<T, DbError>
    where
        F: FnOnce(&Connection) -> Result<T, DbError>,
    {
        let conn = self.conn.lock().map_err(|_| DbError::LockPoisoned)?;
        f(&conn)
    }

    /// Idempotent schema setup; runs on every open.
    fn migrate(&self) -> Result<(), DbError> {
        self.with_conn(|conn| {
            conn.execute_batch(
                "CREATE TABLE IF NOT EXISTS items (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT NOT NULL,
                    description TEXT,
                    price REAL NOT NULL
                );",
            )?;
            Ok(())
        })
    }

    pub fn create_item(&self, input: &CreateItem) -> Result<Item, DbError> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO items (name, description, price) VALUES (?1, ?2, ?3)",
                params![input.name, input.description, input.price],
            )?;
            let id = conn.last_insert_rowid();
            let item =
                conn.query_row("SELECT * FROM items WHERE id = ?1", params![id], row_to_item)?;
            Ok(item)
        })
    }

    pub fn get_item(&self, id: i64) -> Result<Item, DbError> {
        self.with_conn(|conn| {
            conn.query_row("SELECT * FROM items WHERE id = ?1", params![id], row_to_item)
                .map_err(|e| match e {
                    rusqlite::Error::QueryReturnedNoRows => DbError::NotFound(format!("item {id}")),
                    other => DbError::Sqlite(other),
                })
        })
    }

    pub fn list_items(&self) -> Result<Vec<Item>, DbError> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT * FROM items ORDER BY id")?;
            let items = stmt
                .query_map([], row_to_item)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(items)
        })
    }

    pub fn update_item(&self, id: i64, input: &UpdateItem) -> Result<Item, DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE items SET
                     name = COALESCE(?1, name),
                     description = COALESCE(?2, description),
                     price = COALESCE(?3, price)
                 WHERE id = ?4",
                params![input.name, input.description, input.price, id],
            )?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("item {id}")));
            }
            let item =
                conn.query_row("SELECT * FROM items WHERE id = ?1", params![id], row_to_item)?;
            Ok(item)
        })
    }

    pub fn delete_item(&self, id: i64) -> Result<(), DbError> {
        self.with_conn(|conn| {
            let changed = conn.execute("DELETE FROM items WHERE id = ?1", params![id])?;
            if changed == 0 {
                return Err(DbError::NotFound(format!("item {id}")));
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_crud() {
        let db = Db::open_in_memory().unwrap();

        let item = db
            .create_item(&CreateItem {
                name: "Hammer".into(),
                description: Some("Claw hammer".into()),
                price: 12.5,
            })
            .unwrap();
        assert_eq!(item.id, 1);
        assert_eq!(item.name, "Hammer");

        let fetched = db.get_item(item.id).unwrap();
        assert_eq!(fetched, item);

        let all = db.list_items().unwrap();
        assert_eq!(all.len(), 1);

        let updated = db
            .update_item(
                item.id,
                &UpdateItem {
                    price: Some(9.99),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.price, 9.99);
        assert_eq!(updated.name, "Hammer");
        assert_eq!(updated.description.as_deref(), Some("Claw hammer"));

        db.delete_item(item.id).unwrap();
        assert!(matches!(db.get_item(item.id), Err(DbError::NotFound(_))));
    }

    #[test]
    fn ids_grow_monotonically() {
        let db = Db::open_in_memory().unwrap();
        for expected in 1..=3 {
            let item = db
                .create_item(&CreateItem {
                    name: format!("item-{expected}"),
                    description: None,
                    price: 1.0,
                })
                .unwrap();
            assert_eq!(item.id, expected);
        }
    }

    #[test]
    fn update_missing_item_is_not_found() {
        let db = Db::open_in_memory().unwrap();
        let err = db.update_item(999, &UpdateItem::default()).unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }

    #[test]
    fn delete_missing_item_is_not_found() {
        let db = Db::open_in_memory().unwrap();
        let err = db.delete_item(999).unwrap_err();
        assert!(matches!(err, DbError::NotFound(_)));
    }
}
