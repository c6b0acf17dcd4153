mod versioned_schema;

pub use versioned_schema::{Column, SqlType, Table, VersionedSchema};

/// Offset added to schema versions when stored in `PRAGMA user_version`, so that a
/// database created by some other tool (user_version 0) is never mistaken for ours.
pub const BASE_DB_VERSION: usize = 1000;
