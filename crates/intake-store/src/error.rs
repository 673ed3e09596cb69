//! Store error types

use intake_core::TransitionError;
use rusqlite::ErrorCode;

/// Errors from the persistence layer
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Driver or SQL failure
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Additional-services list could not be encoded
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The status workflow forbids the requested step
    #[error(transparent)]
    IllegalTransition(#[from] TransitionError),

    /// A stored row could not be mapped back to a record
    #[error("corrupt row in {table}: {detail}")]
    CorruptRow { table: &'static str, detail: String },

    /// Catalog seed file could not be read
    #[error("seed file error: {0}")]
    SeedIo(#[from] std::io::Error),

    /// Catalog seed file is not valid TOML for a seed
    #[error("seed parse error: {0}")]
    SeedParse(#[from] toml::de::Error),

    /// A seed pricing row names a service the seed does not define
    #[error("seed pricing refers to unknown service: {0}")]
    UnknownSeedService(String),
}

impl StoreError {
    /// Reclassify row-mapping failures raised inside a row closure
    pub(crate) fn from_row(table: &'static str, err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::FromSqlConversionFailure(_, _, source) => Self::CorruptRow {
                table,
                detail: source.to_string(),
            },
            rusqlite::Error::InvalidColumnType(idx, name, ty) => Self::CorruptRow {
                table,
                detail: format!("column {idx} ({name}) has type {ty}"),
            },
            other => Self::Sqlite(other),
        }
    }

    /// Whether retrying the same call may succeed
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Sqlite(rusqlite::Error::SqliteFailure(err, _)) => matches!(
                err.code,
                ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked
            ),
            _ => false,
        }
    }
}

/// Result alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
