use std::io;
use std::path::{Path, PathBuf};

/// Errors returned by tome stores.
///
/// Every failure is reported to the caller; nothing here is fatal to the process.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// A collection or resource name was empty or would escape the store root.
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The addressed resource or collection does not exist.
    #[error("Unable to find file or directory named {}", .path.display())]
    NotFound { path: PathBuf },

    #[error("An error occurred while serializing a record: {message}")]
    RecordSerialization { message: String },
    #[error("An error occurred while deserializing a record: {message}")]
    RecordDeserialization { message: String },

    /// Any other filesystem failure (permissions, disk full, rename failure, ...).
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("An error occurred trying to read the root path {}: {error}", .path.display())]
    RootPathInvalid { path: PathBuf, error: io::Error },
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    /// Wraps an I/O error for `path`, mapping `ErrorKind::NotFound` to [`Error::NotFound`].
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == io::ErrorKind::NotFound {
            Error::NotFound { path }
        } else {
            Error::Io { path, source }
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Error::InvalidArgument { .. })
    }

    pub fn is_encoding(&self) -> bool {
        matches!(
            self,
            Error::RecordSerialization { .. } | Error::RecordDeserialization { .. }
        )
    }
}
