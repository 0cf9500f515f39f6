//! Public error types.
//!
//! The store and the exporter each fail with their own type so that a caller can tell a storage
//! problem from an export problem. Neither type has a variant for "no records": an empty store
//! is an empty `Vec`, and an empty export is a header-only document.

use crate::model::RecordId;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

/// The top-level error returned by command handlers.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Storage(#[from] StorageFault),

    #[error(transparent)]
    Export(#[from] ExportFault),

    #[error("Configuration error: {0:#}")]
    Config(anyhow::Error),

    #[error("No expense with ID {0}")]
    UnknownExpense(RecordId),

    #[error("Expense {0} has no bill attached")]
    NoAttachment(RecordId),
}

/// The durable medium could not complete a read or a write.
///
/// When `insert` fails with this error the record must be assumed unsaved.
#[derive(Debug, thiserror::Error)]
pub enum StorageFault {
    #[error("Unable to open the expense database at '{}': {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: sqlx::Error,
    },

    #[error("The expense database is missing '{}'", .0.display())]
    Missing(PathBuf),

    #[error("The expense database already exists '{}'", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Schema migration failed: {0}")]
    Migration(String),

    #[error("Unable to {operation}: {source}")]
    Query {
        operation: &'static str,
        #[source]
        source: sqlx::Error,
    },

    #[error("Stored expense {id} has an unreadable '{column}' value '{value}'")]
    Decode {
        id: RecordId,
        column: &'static str,
        value: String,
    },
}

impl StorageFault {
    pub(crate) fn query(operation: &'static str) -> impl FnOnce(sqlx::Error) -> Self {
        move |source| Self::Query { operation, source }
    }
}

/// The export could not be completed.
///
/// Every variant leaves the destination as it was before the call: either the previous
/// `Expenses.xlsx` untouched, or no file at all.
#[derive(Debug, thiserror::Error)]
pub enum ExportFault {
    #[error("No downloads directory could be determined; set 'downloads_dir' in config.json")]
    NoDestination,

    #[error("Unable to create the export directory '{}': {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to build the spreadsheet: {0}")]
    Serialize(String),

    #[error("Unable to write the export to '{}': {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to move the export into place at '{}': {source}", path.display())]
    Rename {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to build a file reference for '{}'", .0.display())]
    Reference(PathBuf),
}
