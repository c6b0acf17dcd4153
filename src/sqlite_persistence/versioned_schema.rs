use super::BASE_DB_VERSION;
use anyhow::{bail, Result};
use rusqlite::{params, Connection};

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            // Only mutated when optional field assignments are passed (e.g. `non_null = true`)
            #[allow(unused_mut)]
            let mut column = Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Blob,
}

impl SqlType {
    fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Blob => "BLOB",
        }
    }
}

pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
}

impl Table {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        let columns = self
            .columns
            .iter()
            .map(|column| {
                let mut definition = format!("{} {}", column.name, column.sql_type.as_sql());
                if column.is_primary_key {
                    definition.push_str(" PRIMARY KEY");
                }
                if column.non_null {
                    definition.push_str(" NOT NULL");
                }
                definition
            })
            .collect::<Vec<_>>()
            .join(", ");
        conn.execute(
            &format!("CREATE TABLE IF NOT EXISTS {} ({});", self.name, columns),
            params![],
        )?;
        Ok(())
    }

    /// Checks that the table exists with the expected column names and types, in order.
    pub fn validate(&self, conn: &Connection) -> Result<()> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", self.name))?;
        let actual: Vec<(String, String)> = stmt
            .query_map(params![], |row| Ok((row.get(1)?, row.get(2)?)))?
            .collect::<Result<_, _>>()?;

        if actual.len() != self.columns.len() {
            bail!(
                "Table {} has {} columns, expected {}",
                self.name,
                actual.len(),
                self.columns.len()
            );
        }
        for ((name, sql_type), expected) in actual.iter().zip(self.columns.iter()) {
            if name != expected.name || sql_type != expected.sql_type.as_sql() {
                bail!(
                    "Table {} column mismatch: expected {} {}, got {} {}",
                    self.name,
                    expected.name,
                    expected.sql_type.as_sql(),
                    name,
                    sql_type
                );
            }
        }
        Ok(())
    }
}

pub struct VersionedSchema {
    pub version: usize,
    pub tables: &'static [Table],
    pub migration: Option<fn(&Connection) -> Result<()>>,
}

impl VersionedSchema {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table.create(conn)?;
        }
        conn.pragma_update(None, "user_version", BASE_DB_VERSION + self.version)?;
        Ok(())
    }

    pub fn validate(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table.validate(conn)?;
        }
        Ok(())
    }

    /// Brings `conn` to the last schema of `schemas`, creating it from scratch on an
    /// empty database and running the intermediate migrations otherwise.
    pub fn migrate_if_needed(schemas: &[VersionedSchema], conn: &mut Connection) -> Result<()> {
        let Some(latest) = schemas.last() else {
            bail!("No schema to migrate to");
        };
        let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

        if db_version < BASE_DB_VERSION as i64 {
            let table_count: i64 = conn.query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
                [],
                |r| r.get(0),
            )?;
            if table_count > 0 {
                bail!("Database has tables but no recognizable schema version");
            }
            let tx = conn.transaction()?;
            latest.create(&tx)?;
            tx.commit()?;
            return Ok(());
        }

        let mut current_version = db_version as usize - BASE_DB_VERSION;
        if current_version > latest.version {
            bail!(
                "Database schema version {} is newer than supported version {}",
                current_version,
                latest.version
            );
        }

        let from_version = current_version;
        let tx = conn.transaction()?;
        for schema in schemas.iter().filter(|s| s.version > from_version) {
            if let Some(migration) = schema.migration {
                tracing::info!(
                    "Migrating db from version {} to {}",
                    current_version,
                    schema.version
                );
                migration(&tx)?;
            }
            current_version = schema.version;
        }
        tx.pragma_update(None, "user_version", BASE_DB_VERSION + current_version)?;
        tx.commit()?;

        latest.validate(conn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const V0_COLUMNS: &[Column] = &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("payload", &SqlType::Blob),
    ];
    const V1_COLUMNS: &[Column] = &[
        sqlite_column!("id", &SqlType::Text, is_primary_key = true),
        sqlite_column!("payload", &SqlType::Blob),
        sqlite_column!("plays", &SqlType::Integer, non_null = true),
    ];

    fn add_plays(conn: &Connection) -> Result<()> {
        conn.execute(
            "ALTER TABLE things ADD COLUMN plays INTEGER NOT NULL DEFAULT 0",
            [],
        )?;
        Ok(())
    }

    const SCHEMAS: &[VersionedSchema] = &[
        VersionedSchema {
            version: 0,
            tables: &[Table {
                name: "things",
                columns: V0_COLUMNS,
            }],
            migration: None,
        },
        VersionedSchema {
            version: 1,
            tables: &[Table {
                name: "things",
                columns: V1_COLUMNS,
            }],
            migration: Some(add_plays),
        },
    ];

    fn user_version(conn: &Connection) -> i64 {
        conn.query_row("PRAGMA user_version", [], |r| r.get(0))
            .unwrap()
    }

    #[test]
    fn creates_latest_schema_on_empty_db() {
        let mut conn = Connection::open_in_memory().unwrap();
        VersionedSchema::migrate_if_needed(SCHEMAS, &mut conn).unwrap();

        assert_eq!(user_version(&conn), BASE_DB_VERSION as i64 + 1);
        SCHEMAS[1].validate(&conn).unwrap();
    }

    #[test]
    fn runs_pending_migrations() {
        let mut conn = Connection::open_in_memory().unwrap();
        VersionedSchema::migrate_if_needed(&SCHEMAS[..1], &mut conn).unwrap();
        assert!(SCHEMAS[1].validate(&conn).is_err());

        VersionedSchema::migrate_if_needed(SCHEMAS, &mut conn).unwrap();
        assert_eq!(user_version(&conn), BASE_DB_VERSION as i64 + 1);
    }

    #[test]
    fn rejects_unversioned_db_with_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        conn.execute("CREATE TABLE foreign_table (x TEXT)", [])
            .unwrap();

        assert!(VersionedSchema::migrate_if_needed(SCHEMAS, &mut conn).is_err());
    }

    #[test]
    fn rejects_newer_db() {
        let mut conn = Connection::open_in_memory().unwrap();
        VersionedSchema::migrate_if_needed(SCHEMAS, &mut conn).unwrap();

        assert!(VersionedSchema::migrate_if_needed(&SCHEMAS[..1], &mut conn).is_err());
    }
}
