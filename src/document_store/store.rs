//! SQLite-backed document store.
//!
//! One connection guarded by a mutex is shared by every collection handle; each store
//! operation holds the lock only for the statements it runs.

use super::collection::{Collection, CollectionHandle};
use super::document::Document;
use super::schema::DOCUMENT_STORE_VERSIONED_SCHEMAS;
use crate::sqlite_persistence::VersionedSchema;
use anyhow::{Context, Result};
use regex::Regex;
use rusqlite::functions::FunctionFlags;
use rusqlite::types::ValueRef;
use rusqlite::{Connection, TransactionBehavior};
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info, warn};

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Clone)]
pub struct DocumentStore {
    conn: Arc<Mutex<Connection>>,
}

/// Registers `regexp(pattern, text)`. NULL or non-text values never match.
fn register_regexp_function(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "regexp",
        2,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let regex: Arc<Regex> = ctx.get_or_create_aux(0, |pattern| -> Result<_, BoxError> {
                Ok(Regex::new(pattern.as_str()?)?)
            })?;
            let is_match = match ctx.get_raw(1) {
                ValueRef::Text(text) => std::str::from_utf8(text)
                    .map(|text| regex.is_match(text))
                    .unwrap_or(false),
                _ => false,
            };
            Ok(is_match)
        },
    )
}

impl DocumentStore {
    /// Opens (creating if needed) the store at `db_path`.
    pub fn open<P: AsRef<Path>>(db_path: P, busy_timeout: Duration) -> Result<Self> {
        let db_path = db_path.as_ref();
        let mut conn = Connection::open(db_path)
            .with_context(|| format!("Failed to open document store at {:?}", db_path))?;

        conn.busy_timeout(busy_timeout)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "FULL")?;
        register_regexp_function(&conn).context("Failed to register regexp function")?;

        VersionedSchema::migrate_if_needed(DOCUMENT_STORE_VERSIONED_SCHEMAS, &mut conn)
            .context("Failed to migrate document store schema")?;

        let store = DocumentStore {
            conn: Arc::new(Mutex::new(conn)),
        };
        if let Some(schema) = DOCUMENT_STORE_VERSIONED_SCHEMAS.last() {
            for table in schema.tables {
                info!(
                    "Collection {}: {} documents",
                    table.name,
                    store.count_documents(table.name)?
                );
            }
        }
        Ok(store)
    }

    pub fn collection<D: Document>(&self) -> Collection<D> {
        Collection::new(self.clone())
    }

    /// Runs `f` with the store connection locked.
    pub(crate) fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> T) -> T {
        let conn = self.conn.lock().unwrap();
        f(&conn)
    }

    pub fn count_documents(&self, collection: &str) -> Result<i64> {
        self.with_conn(|conn| {
            conn.query_row(&format!("SELECT COUNT(*) FROM {}", collection), [], |r| {
                r.get(0)
            })
            .with_context(|| format!("Failed to count documents in {}", collection))
        })
    }

    /// Runs `unit` inside one transaction.
    ///
    /// The transaction takes the write lock up front, so every read inside `unit` sees one
    /// consistent snapshot. It commits when `unit` succeeds; otherwise it is rolled back and
    /// the error of `unit` is returned, even when the rollback itself fails. A failed commit is
    /// rolled back as well. Nothing is retried.
    pub fn exec_tx<T, E, F>(&self, unit: F) -> Result<T, E>
    where
        F: FnOnce(&TxSession<'_>) -> Result<T, E>,
        E: From<rusqlite::Error>,
    {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let result = unit(&TxSession { conn: &tx });

        match result {
            Ok(value) => {
                tx.commit()?;
                debug!("Transaction committed");
                Ok(value)
            }
            Err(err) => {
                if let Err(abort_err) = tx.rollback() {
                    warn!("Failed to abort transaction: {}", abort_err);
                }
                Err(err)
            }
        }
    }
}

/// Handle given to a unit of work running inside [`DocumentStore::exec_tx`].
pub struct TxSession<'a> {
    conn: &'a Connection,
}

impl<'a> TxSession<'a> {
    /// Collection operations bound to the running transaction.
    pub fn collection<D: Document>(&self) -> CollectionHandle<'a, D> {
        CollectionHandle::new(self.conn)
    }
}
