//! Embedded SQL migrations
//!
//! Migrations are embedded at compile time using include_str!

use crate::tables::StoreKind;

/// Migration metadata
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

const DOCSTORE_MIGRATIONS: &[Migration] = &[Migration {
    id: "docstore_001_tables",
    sql: include_str!("../../migrations/docstore/001_docstore_tables.sql"),
}];

const INDEXSTORE_MIGRATIONS: &[Migration] = &[Migration {
    id: "indexstore_001_index_metadata",
    sql: include_str!("../../migrations/indexstore/001_index_metadata.sql"),
}];

/// All migrations for a store kind, in application order
pub fn migrations_for(kind: StoreKind) -> &'static [Migration] {
    match kind {
        StoreKind::Document => DOCSTORE_MIGRATIONS,
        StoreKind::Index => INDEXSTORE_MIGRATIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_ids_unique_across_kinds() {
        let mut ids: Vec<_> = migrations_for(StoreKind::Document)
            .iter()
            .chain(migrations_for(StoreKind::Index))
            .map(|m| m.id)
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_migrations_only_create_if_absent() {
        for kind in [StoreKind::Document, StoreKind::Index] {
            for migration in migrations_for(kind) {
                let sql = migration.sql.to_ascii_uppercase();
                assert!(!sql.contains("DROP "), "{} drops", migration.id);
                assert!(!sql.contains("ALTER "), "{} alters", migration.id);
                for table in kind.tables() {
                    assert!(
                        sql.contains(&format!("CREATE TABLE IF NOT EXISTS {}", table.name.to_ascii_uppercase())),
                        "{} does not create {}",
                        migration.id,
                        table.name
                    );
                }
            }
        }
    }
}
