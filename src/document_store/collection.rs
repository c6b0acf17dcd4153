//! Generic store client: CRUD and free-text search over one collection.

use super::document::Document;
use super::error::{CatalogError, CatalogResult};
use super::filter::Filter;
use super::object_id::ObjectId;
use super::store::DocumentStore;
use crate::server::metrics::record_db_query;
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};
use std::marker::PhantomData;
use std::time::Instant;
use tracing::debug;

/// Store client capability, implemented once for every [`Document`] kind.
pub trait EntityStore<D: Document>: Send + Sync {
    /// Stores a new document under a freshly assigned id and returns it with the id set.
    fn insert(&self, document: D) -> CatalogResult<D>;

    /// First match by ascending id, `NotFound` when nothing matches.
    fn find_one(&self, filter: &Filter) -> CatalogResult<D>;

    /// Replaces the whole first match with `document` and returns the stored state.
    /// The matched id is kept whatever `document` carries.
    fn find_one_and_replace(&self, filter: &Filter, document: &D) -> CatalogResult<D>;

    /// Deletes at most one match. Deleting nothing is not an error.
    fn remove_one(&self, filter: &Filter) -> CatalogResult<()>;

    /// Case-insensitive substring search over the searchable fields of `D`.
    /// Paginated only when both `page` and `page_size` are positive.
    fn search(&self, query: &str, page: usize, page_size: usize) -> CatalogResult<Vec<D>>;

    /// Number of documents `search` would return without pagination.
    fn count(&self, query: &str) -> CatalogResult<u64>;
}

/// Regex matching `query` literally, ignoring case.
pub(crate) fn search_pattern(query: &str) -> String {
    format!("(?i){}", regex::escape(query))
}

/// `(limit, offset)` for SQLite; a negative limit means no limit.
///
/// Values beyond `i64::MAX` saturate, so a page far past the end selects nothing.
pub(crate) fn page_window(page: usize, page_size: usize) -> (i64, i64) {
    if page == 0 || page_size == 0 {
        return (-1, 0);
    }
    let limit = i64::try_from(page_size).unwrap_or(i64::MAX);
    let offset = (page - 1)
        .checked_mul(page_size)
        .and_then(|offset| i64::try_from(offset).ok())
        .unwrap_or(i64::MAX);
    (limit, offset)
}

/// Collection operations on a borrowed connection, either a plain one or a transaction.
pub struct CollectionHandle<'c, D> {
    conn: &'c Connection,
    _document: PhantomData<fn() -> D>,
}

impl<'c, D: Document> CollectionHandle<'c, D> {
    pub(crate) fn new(conn: &'c Connection) -> Self {
        CollectionHandle {
            conn,
            _document: PhantomData,
        }
    }

    pub fn insert(&self, mut document: D) -> CatalogResult<D> {
        let id = ObjectId::new();
        document.set_id(id);
        let json = serde_json::to_string(&document)?;
        self.conn.execute(
            &format!(
                "INSERT INTO {} (_id, document) VALUES (?1, ?2)",
                D::COLLECTION
            ),
            params![id.to_hex(), json],
        )?;
        debug!("Inserted {} into {}", id, D::COLLECTION);
        Ok(document)
    }

    pub fn find_one(&self, filter: &Filter) -> CatalogResult<D> {
        let (predicate, values) = filter.to_sql();
        let json: String = self
            .conn
            .query_row(
                &format!(
                    "SELECT document FROM {} WHERE {} ORDER BY _id ASC LIMIT 1",
                    D::COLLECTION,
                    predicate
                ),
                params_from_iter(values),
                |r| r.get(0),
            )
            .map_err(|e| CatalogError::from_query(e, D::COLLECTION))?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn find_one_and_replace(&self, filter: &Filter, document: &D) -> CatalogResult<D> {
        let (predicate, filter_values) = filter.to_sql();
        let mut values = vec![Value::Text(serde_json::to_string(document)?)];
        values.extend(filter_values);

        let json: String = self
            .conn
            .query_row(
                &format!(
                    "UPDATE {c} SET document = json_set(?, '$.id', _id) \
                     WHERE _id = (SELECT _id FROM {c} WHERE {p} ORDER BY _id ASC LIMIT 1) \
                     RETURNING document",
                    c = D::COLLECTION,
                    p = predicate
                ),
                params_from_iter(values),
                |r| r.get(0),
            )
            .map_err(|e| CatalogError::from_query(e, D::COLLECTION))?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn remove_one(&self, filter: &Filter) -> CatalogResult<()> {
        let (predicate, values) = filter.to_sql();
        let removed = self.conn.execute(
            &format!(
                "DELETE FROM {c} WHERE _id = (SELECT _id FROM {c} WHERE {p} ORDER BY _id ASC LIMIT 1)",
                c = D::COLLECTION,
                p = predicate
            ),
            params_from_iter(values),
        )?;
        debug!("Removed {} document(s) from {}", removed, D::COLLECTION);
        Ok(())
    }

    pub fn search(&self, query: &str, page: usize, page_size: usize) -> CatalogResult<Vec<D>> {
        let (predicate, binds) = D::SEARCH_SCOPE.predicate(D::COLLECTION);
        let (limit, offset) = page_window(page, page_size);

        let mut values: Vec<Value> = std::iter::repeat(Value::Text(search_pattern(query)))
            .take(binds)
            .collect();
        values.push(Value::Integer(limit));
        values.push(Value::Integer(offset));

        let mut stmt = self.conn.prepare(&format!(
            "SELECT document FROM {c} WHERE {p} ORDER BY {c}.rowid LIMIT ? OFFSET ?",
            c = D::COLLECTION,
            p = predicate
        ))?;
        let documents = stmt
            .query_map(params_from_iter(values), |r| r.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        documents
            .iter()
            .map(|json| serde_json::from_str(json).map_err(CatalogError::from))
            .collect()
    }

    pub fn count(&self, query: &str) -> CatalogResult<u64> {
        let (predicate, binds) = D::SEARCH_SCOPE.predicate(D::COLLECTION);
        let values = std::iter::repeat(Value::Text(search_pattern(query))).take(binds);
        let count: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {c} WHERE {p}",
                c = D::COLLECTION,
                p = predicate
            ),
            params_from_iter(values),
            |r| r.get(0),
        )?;
        Ok(count as u64)
    }

    /// Removes from the embedded array `array` of document `id` every element whose `id`
    /// equals `embedded_id`, keeping the order of the others. Untouched when nothing matches.
    pub(crate) fn pull_embedded(
        &self,
        id: ObjectId,
        array: &str,
        embedded_id: ObjectId,
    ) -> CatalogResult<()> {
        let pulled = self.conn.execute(
            &format!(
                "UPDATE {c} SET document = json_set(document, '$.{a}', json(( \
                     SELECT json_group_array(json(embedded.value) ORDER BY embedded.key) \
                     FROM json_each({c}.document, '$.{a}') AS embedded \
                     WHERE json_extract(embedded.value, '$.id') IS NOT ?1))) \
                 WHERE _id = ?2 AND EXISTS ( \
                     SELECT 1 FROM json_each({c}.document, '$.{a}') AS embedded \
                     WHERE json_extract(embedded.value, '$.id') = ?1)",
                c = D::COLLECTION,
                a = array
            ),
            params![embedded_id.to_hex(), id.to_hex()],
        )?;
        debug!(
            "Pulled {} from {}.{} of {} ({} document(s) changed)",
            embedded_id,
            D::COLLECTION,
            array,
            id,
            pulled
        );
        Ok(())
    }
}

/// Store client bound to a [`DocumentStore`]; every call locks the store connection.
pub struct Collection<D> {
    store: DocumentStore,
    _document: PhantomData<fn() -> D>,
}

impl<D: Document> Collection<D> {
    pub(crate) fn new(store: DocumentStore) -> Self {
        Collection {
            store,
            _document: PhantomData,
        }
    }

    pub(crate) fn run<T>(
        &self,
        operation: &'static str,
        f: impl FnOnce(CollectionHandle<'_, D>) -> CatalogResult<T>,
    ) -> CatalogResult<T> {
        let start = Instant::now();
        let result = self.store.with_conn(|conn| f(CollectionHandle::new(conn)));
        record_db_query(
            &format!("{}.{}", D::COLLECTION, operation),
            start.elapsed(),
        );
        if let Err(err) = &result {
            debug!("{}.{} failed: {}", D::COLLECTION, operation, err);
        }
        result
    }
}

impl<D: Document> EntityStore<D> for Collection<D> {
    fn insert(&self, document: D) -> CatalogResult<D> {
        self.run("insert", |c| c.insert(document))
    }

    fn find_one(&self, filter: &Filter) -> CatalogResult<D> {
        self.run("find_one", |c| c.find_one(filter))
    }

    fn find_one_and_replace(&self, filter: &Filter, document: &D) -> CatalogResult<D> {
        self.run("find_one_and_replace", |c| {
            c.find_one_and_replace(filter, document)
        })
    }

    fn remove_one(&self, filter: &Filter) -> CatalogResult<()> {
        self.run("remove_one", |c| c.remove_one(filter))
    }

    fn search(&self, query: &str, page: usize, page_size: usize) -> CatalogResult<Vec<D>> {
        self.run("search", |c| c.search(query, page, page_size))
    }

    fn count(&self, query: &str) -> CatalogResult<u64> {
        self.run("count", |c| c.count(query))
    }
}
