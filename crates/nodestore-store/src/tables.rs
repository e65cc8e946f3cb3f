//! Store kinds and the tables each one owns
//!
//! Every table has the same shape: a text primary key and a `payload`
//! column holding the codec's encoding of one value.

/// Which of the two store files a connection points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreKind {
    Document,
    Index,
}

impl StoreKind {
    /// Stable name used in logs and error context
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreKind::Document => "docstore",
            StoreKind::Index => "indexstore",
        }
    }

    /// File name used when the caller does not override it
    pub fn default_file_name(&self) -> &'static str {
        match self {
            StoreKind::Document => DOCSTORE_DB,
            StoreKind::Index => INDEXSTORE_DB,
        }
    }

    /// The store kind that must never share a file with this one
    pub fn other(&self) -> StoreKind {
        match self {
            StoreKind::Document => StoreKind::Index,
            StoreKind::Index => StoreKind::Document,
        }
    }

    /// Tables owned by this kind, in write order
    pub fn tables(&self) -> &'static [Table] {
        match self {
            StoreKind::Document => &[DOCUMENTS, REF_DOC_INFO, METADATA],
            StoreKind::Index => &[INDEX_METADATA],
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Default document store file name
pub const DOCSTORE_DB: &str = "docstore.sqlite";

/// Default index store file name
pub const INDEXSTORE_DB: &str = "indexstore.sqlite";

/// A key/payload table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Table {
    pub name: &'static str,
    pub key_column: &'static str,
}

impl Table {
    pub(crate) fn delete_all_sql(&self) -> String {
        format!("DELETE FROM {}", self.name)
    }

    pub(crate) fn insert_sql(&self) -> String {
        format!(
            "INSERT OR REPLACE INTO {} ({}, payload) VALUES (?1, ?2)",
            self.name, self.key_column
        )
    }

    pub(crate) fn select_all_sql(&self) -> String {
        format!(
            "SELECT {key}, payload FROM {table} ORDER BY {key}",
            key = self.key_column,
            table = self.name
        )
    }
}

pub const DOCUMENTS: Table = Table {
    name: "documents",
    key_column: "doc_id",
};

pub const REF_DOC_INFO: Table = Table {
    name: "ref_doc_info",
    key_column: "doc_id",
};

pub const METADATA: Table = Table {
    name: "metadata",
    key_column: "key",
};

pub const INDEX_METADATA: Table = Table {
    name: "index_metadata",
    key_column: "key",
};
