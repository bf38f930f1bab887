use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a run. Cancelling the file picker is not an
/// error, see [`crate::app::Outcome::Cancelled`].
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("could not read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("not a valid calendar: {0}")]
    Parse(String),

    #[error("invalid {property} value {value:?}")]
    InvalidTimestamp { property: String, value: String },

    #[error("could not write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
