use super::object_id::ObjectId;
use rusqlite::types::Value;

/// Selection of documents for single-document operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    Id(ObjectId),
    /// Top-level field equal to a JSON scalar.
    FieldEq(&'static str, serde_json::Value),
}

impl Filter {
    pub fn by_id(id: ObjectId) -> Self {
        Filter::Id(id)
    }

    pub fn field_eq(field: &'static str, value: impl Into<serde_json::Value>) -> Self {
        Filter::FieldEq(field, value.into())
    }

    /// SQL predicate with anonymous `?` placeholders and the values to bind, in order.
    pub(crate) fn to_sql(&self) -> (String, Vec<Value>) {
        match self {
            Filter::Id(id) => ("_id = ?".to_string(), vec![Value::Text(id.to_hex())]),
            Filter::FieldEq(field, value) => (
                "json_extract(document, ?) = json_extract(?, '$')".to_string(),
                vec![
                    Value::Text(format!("$.{}", field)),
                    Value::Text(value.to_string()),
                ],
            ),
        }
    }
}
