//! Pooled SQLite implementation of [`ProductRepository`].
//!
//! Uses r2d2 with r2d2_sqlite for pooled read/write access.
//! SQLite WAL mode allows concurrent readers alongside a writer.

use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::{params, OptionalExtension, Row, TransactionBehavior};
use std::path::Path;

use super::schema::{apply_pragmas, initialize_schema};
use super::{ProductRepository, StoreError};
use crate::model::{Product, ProductInput};

const SELECT_COLUMNS: &str = "SELECT id, name, price, description FROM products";

/// Product repository backed by a SQLite connection pool.
#[derive(Clone)]
pub struct SqliteProductRepository {
    pool: Pool<SqliteConnectionManager>,
}

impl SqliteProductRepository {
    /// Open (or create) the database at `db_path` and ensure the schema exists.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the SQLite database file
    /// * `max_size` - Maximum number of connections in the pool
    pub fn open<P: AsRef<Path>>(db_path: P, max_size: u32) -> Result<Self, StoreError> {
        let manager = SqliteConnectionManager::file(db_path);

        let pool = Pool::builder()
            .max_size(max_size)
            .connection_customizer(Box::new(PragmaCustomizer))
            .build(manager)?;

        initialize_schema(&*pool.get()?)?;

        Ok(Self { pool })
    }

    /// Get a connection from the pool.
    fn get(&self) -> Result<PooledConnection<SqliteConnectionManager>, StoreError> {
        Ok(self.pool.get()?)
    }
}

fn product_from_row(row: &Row<'_>) -> rusqlite::Result<Product> {
    Ok(Product {
        id: row.get(0)?,
        name: row.get(1)?,
        price: row.get(2)?,
        description: row.get(3)?,
    })
}

fn insert_row(conn: &rusqlite::Connection, input: &ProductInput) -> rusqlite::Result<Product> {
    conn.execute(
        "INSERT INTO products (name, price, description) VALUES (?1, ?2, ?3)",
        params![input.name, input.price, input.description],
    )?;
    Ok(input.clone().with_id(conn.last_insert_rowid()))
}

impl ProductRepository for SqliteProductRepository {
    fn find_all(&self) -> Result<Vec<Product>, StoreError> {
        let conn = self.get()?;
        let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id ASC"))?;
        let rows = stmt
            .query_map([], product_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    fn find_by_id(&self, id: i64) -> Result<Option<Product>, StoreError> {
        let conn = self.get()?;
        let product = conn
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id],
                product_from_row,
            )
            .optional()?;
        Ok(product)
    }

    fn insert(&self, input: &ProductInput) -> Result<Product, StoreError> {
        let conn = self.get()?;
        Ok(insert_row(&conn, input)?)
    }

    fn insert_all(&self, inputs: &[ProductInput]) -> Result<Vec<Product>, StoreError> {
        let mut conn = self.get()?;
        let tx = conn.transaction()?;
        let products = inputs
            .iter()
            .map(|input| insert_row(&tx, input))
            .collect::<Result<Vec<_>, _>>()?;
        tx.commit()?;
        Ok(products)
    }

    fn update(&self, id: i64, changes: &ProductInput) -> Result<Option<Product>, StoreError> {
        let mut conn = self.get()?;
        // Take the write lock up front: a deferred read would fail to upgrade
        // once another connection commits.
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let existing = tx
            .query_row(
                &format!("{SELECT_COLUMNS} WHERE id = ?1"),
                [id],
                product_from_row,
            )
            .optional()?;

        let Some(mut product) = existing else {
            return Ok(None);
        };

        product.apply(changes.clone());
        tx.execute(
            "UPDATE products SET name = ?1, price = ?2, description = ?3 WHERE id = ?4",
            params![product.name, product.price, product.description, product.id],
        )?;
        tx.commit()?;

        Ok(Some(product))
    }

    fn delete_by_id(&self, id: i64) -> Result<bool, StoreError> {
        let conn = self.get()?;
        let deleted = conn.execute("DELETE FROM products WHERE id = ?1", [id])?;
        Ok(deleted > 0)
    }
}

/// Connection customizer that applies pragmas on acquire.
#[derive(Debug)]
struct PragmaCustomizer;

impl r2d2::CustomizeConnection<rusqlite::Connection, rusqlite::Error> for PragmaCustomizer {
    fn on_acquire(&self, conn: &mut rusqlite::Connection) -> Result<(), rusqlite::Error> {
        apply_pragmas(conn)
    }
}
