//! Error types for modelsql

use crate::value::FieldType;
use thiserror::Error;

/// Result type alias for modelsql operations
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for model mapping, statement building and execution
#[derive(Debug, Error)]
pub enum OrmError {
    /// The query returned no rows where exactly one was expected
    #[error("no rows in result set")]
    NoRows,

    /// The query returned more rows than expected
    #[error("expected {expected} row(s), got {got}")]
    TooManyRows { expected: usize, got: usize },

    /// UPDATE without any column to set
    #[error("no columns to update")]
    NoUpdatedColumns,

    /// A table reference used where it cannot be rendered
    #[error("unsupported table reference: {0}")]
    UnsupportedTableType(String),

    /// Column name that does not resolve against the model in scope
    #[error("unknown column '{0}'")]
    UnknownColumn(String),

    /// The entity type could not be registered
    #[error("model not found for '{entity}': {source}")]
    ModelNotFound {
        entity: &'static str,
        #[source]
        source: Box<OrmError>,
    },

    /// The type cannot be mapped to a table
    #[error("unsupported type '{0}': only structs with named fields can be mapped")]
    UnsupportedType(String),

    /// Entity metadata is inconsistent (duplicate names, bad layout, ...)
    #[error("invalid model '{entity}': {message}")]
    InvalidModel {
        entity: &'static str,
        message: String,
    },

    /// Field name that does not exist on the entity
    #[error("unknown field '{0}'")]
    UnknownField(String),

    /// A value that cannot be stored in the field
    #[error("type mismatch on field '{field}': expected {expected}, found {found}")]
    TypeMismatch {
        field: String,
        expected: FieldType,
        found: &'static str,
    },

    /// An accessor or mapping used with a model of another type
    #[error("model of '{expected}' cannot be used with '{found}'")]
    ModelMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// Builder configured in a way that cannot produce a statement
    #[error("Validation error: {0}")]
    Validation(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Row decode error
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// Driver error
    #[cfg(feature = "postgres")]
    #[error("Query error: {0}")]
    Query(#[from] tokio_postgres::Error),
}

impl OrmError {
    /// Create an unknown column error
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn(name.into())
    }

    /// Create an unknown field error
    pub fn unknown_field(name: impl Into<String>) -> Self {
        Self::UnknownField(name.into())
    }

    /// Wrap a registration failure for `entity`
    pub fn model_not_found(entity: &'static str, source: OrmError) -> Self {
        Self::ModelNotFound {
            entity,
            source: Box::new(source),
        }
    }

    /// Create an invalid model error
    pub fn invalid_model(entity: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidModel {
            entity,
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Check if this is a no rows error
    pub fn is_no_rows(&self) -> bool {
        matches!(self, Self::NoRows)
    }

    /// Check if this is a type mismatch error
    pub fn is_type_mismatch(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }

    /// The innermost error, looking through `ModelNotFound`.
    pub fn root_cause(&self) -> &OrmError {
        match self {
            Self::ModelNotFound { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
