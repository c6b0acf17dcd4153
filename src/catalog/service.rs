use super::list_request::ListRequest;
use crate::document_store::{CatalogResult, Document, EntityStore, Filter, ObjectId};
use crate::merge::Merge;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Create/View/Update/Delete/Search for one entity kind, on top of its store client.
///
/// Update and Delete read the entity first and then write it in a second store call, without
/// a transaction: two concurrent updates of the same entity end with the last write winning
/// for the whole document.
pub struct EntityService<D, S> {
    store: Arc<S>,
    _document: PhantomData<fn() -> D>,
}

impl<D, S> Clone for EntityService<D, S> {
    fn clone(&self) -> Self {
        EntityService {
            store: self.store.clone(),
            _document: PhantomData,
        }
    }
}

impl<D: Document, S: EntityStore<D>> EntityService<D, S> {
    pub fn new(store: Arc<S>) -> Self {
        EntityService {
            store,
            _document: PhantomData,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Merges `data` onto an empty entity and stores it under a new id.
    pub fn create<C>(&self, data: &C) -> CatalogResult<D>
    where
        D: Default + Merge<C>,
    {
        let mut entity = D::default();
        entity.merge(data);
        let created = self.store.insert(entity)?;
        debug!(
            "Created {} in {}",
            created.id().map(|id| id.to_hex()).unwrap_or_default(),
            D::COLLECTION
        );
        Ok(created)
    }

    pub fn view(&self, id: &str) -> CatalogResult<D> {
        let id = ObjectId::parse_str(id)?;
        self.store.find_one(&Filter::by_id(id))
    }

    /// Merges the fields present in `data` onto the current entity and replaces it.
    pub fn update<U>(&self, id: &str, data: &U) -> CatalogResult<D>
    where
        D: Merge<U>,
    {
        let object_id = ObjectId::parse_str(id)?;
        let mut current = self.store.find_one(&Filter::by_id(object_id))?;
        current.merge(data);
        self.store
            .find_one_and_replace(&Filter::by_id(object_id), &current)
    }

    pub fn delete(&self, id: &str) -> CatalogResult<()> {
        let object_id = ObjectId::parse_str(id)?;
        self.store.find_one(&Filter::by_id(object_id))?;
        self.store.remove_one(&Filter::by_id(object_id))
    }

    pub fn search(&self, request: &ListRequest) -> CatalogResult<Vec<D>> {
        let query = request.search_query()?;
        self.store.search(&query, request.page, request.limit)
    }

    /// Total number of entities matching the filter of `request`, ignoring its paging.
    pub fn count(&self, request: &ListRequest) -> CatalogResult<u64> {
        let query = request.search_query()?;
        self.store.count(&query)
    }
}
