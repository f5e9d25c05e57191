use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::model::item::ItemId;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// A table or column the launcher schema requires is missing, or the
    /// stored rows break an invariant of that schema.
    #[error("schema error: {0}")]
    Schema(String),

    /// Grid placement went out of the bounds the dimension pass computed.
    /// Seeing this means the calculator and the builder disagree.
    #[error("placement error: item {item} at {what} is outside the {bounds} grid")]
    Placement {
        item: ItemId,
        what: String,
        bounds: String,
    },

    #[error("malformed item {id}: column `{column}` {reason}")]
    Render {
        id: ItemId,
        column: String,
        reason: String,
    },

    #[error("`{command}` failed: {reason}")]
    ExternalProcess { command: String, reason: String },

    #[error("invalid configuration in {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }

    pub(crate) fn process_status(command: String, status: ExitStatus, stderr: &str) -> Self {
        let mut reason = match status.code() {
            Some(code) => format!("exited with status {code}"),
            None => "terminated by signal".to_string(),
        };
        let stderr = stderr.trim();
        if !stderr.is_empty() {
            reason = format!("{reason}: {stderr}");
        }
        Error::ExternalProcess { command, reason }
    }
}
