use super::object_id::ObjectId;
use serde::{de::DeserializeOwned, Serialize};

/// Which fields a free-text search looks at.
#[derive(Debug, Clone, Copy)]
pub enum SearchScope {
    /// Top-level fields of the document.
    Fields(&'static [&'static str]),
    /// Fields of any element of an embedded array: the document matches when at least one
    /// element matches.
    EmbeddedAny {
        array: &'static str,
        fields: &'static [&'static str],
    },
}

impl SearchScope {
    /// SQL predicate over `<collection>.document`. Every `?` in the returned text is the same
    /// search pattern, so the caller binds it once per field.
    pub(crate) fn predicate(&self, collection: &str) -> (String, usize) {
        match self {
            SearchScope::Fields(fields) => (
                any_field_matches(&format!("{}.document", collection), fields),
                fields.len(),
            ),
            SearchScope::EmbeddedAny { array, fields } => (
                format!(
                    "EXISTS (SELECT 1 FROM json_each({}.document, '$.{}') AS embedded WHERE {})",
                    collection,
                    array,
                    any_field_matches("embedded.value", fields)
                ),
                fields.len(),
            ),
        }
    }
}

fn any_field_matches(source: &str, fields: &[&str]) -> String {
    let clauses = fields
        .iter()
        .map(|field| format!("regexp(?, json_extract({}, '$.{}'))", source, field))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!("({})", clauses)
}

/// Schema descriptor of an entity persisted as a JSON document in its own collection.
pub trait Document: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    const COLLECTION: &'static str;
    const SEARCH_SCOPE: SearchScope;

    fn id(&self) -> Option<ObjectId>;

    fn set_id(&mut self, id: ObjectId);
}
