use nodestore_core_types::OperationId;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the persistence layer carries one of these
/// kinds. Each kind maps to a stable error code usable for programmatic
/// handling and test assertions.
///
/// Only `NotFound` is recoverable by callers (start a fresh store); every
/// other kind is final for the call that raised it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// No database file exists at the resolved persist path, or an entry
    /// requested from an in-memory store is absent
    NotFound,
    /// Table creation or schema version bookkeeping failed
    Schema,
    /// A payload could not be encoded, or a stored payload could not be decoded
    Serialization,
    /// Filesystem failure outside the database engine (directory creation, stat)
    Io,
    /// Database engine failure (open, lock, write, commit, close)
    Persistence,
    /// Caller supplied an unusable argument (file name, snapshot shape, config)
    InvalidInput,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::Schema => "ERR_SCHEMA",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification (`kind`) plus whatever context the failing
/// operation had at hand: operation name, the key of the offending entry,
/// the database path and the operation id that ties it to log events.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    path: Option<PathBuf>,
    op_id: Option<OperationId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            path: None,
            op_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the key of the entry involved (node id, ref doc id, metadata key)
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add the database file path involved
    pub fn with_path(mut self, path: impl AsRef<Path>) -> Self {
        self.path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Add the id of the operation that failed
    pub fn with_op_id(mut self, op_id: OperationId) -> Self {
        self.op_id = Some(op_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// True when the store file is absent (the only recoverable failure)
    pub fn is_not_found(&self) -> bool {
        self.kind == ExErrorKind::NotFound
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the database path, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the operation id, if any
    pub fn op_id(&self) -> Option<&OperationId> {
        self.op_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Errors raised by the in-memory stores and snapshot value types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    /// Document not found in the document store
    #[error("Document not found: {node_id}")]
    DocumentNotFound { node_id: String },

    /// Reference document not found in the document store
    #[error("Ref doc not found: {ref_doc_id}")]
    RefDocNotFound { ref_doc_id: String },

    /// Index struct not found in the index store
    #[error("Index struct not found: {index_id}")]
    IndexStructNotFound { index_id: String },

    /// No index id given and the store does not hold exactly one index struct
    #[error("Index id required: store holds {count} index structs")]
    AmbiguousIndexStruct { count: usize },

    /// Extra metadata used a key reserved for a snapshot namespace
    #[error("Reserved snapshot key used as metadata: {key}")]
    ReservedKey { key: String },

    /// A mapping-shaped value was expected
    #[error("Invalid snapshot shape: {reason}")]
    InvalidSnapshotShape { reason: String },
}

impl From<StoreError> for ExError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DocumentNotFound { node_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(node_id)
                .with_message("Document not found"),

            StoreError::RefDocNotFound { ref_doc_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(ref_doc_id)
                .with_message("Ref doc not found"),

            StoreError::IndexStructNotFound { index_id } => ExError::new(ExErrorKind::NotFound)
                .with_entity_id(index_id)
                .with_message("Index struct not found"),

            StoreError::AmbiguousIndexStruct { count } => ExError::new(ExErrorKind::InvalidInput)
                .with_message(format!(
                    "Index id required: store holds {} index structs",
                    count
                )),

            StoreError::ReservedKey { key } => ExError::new(ExErrorKind::InvalidInput)
                .with_entity_id(key)
                .with_message("Key is reserved for a snapshot namespace"),

            StoreError::InvalidSnapshotShape { reason } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(reason)
            }
        }
    }
}
