use std::fmt;
use std::sync::Arc;

use crate::logger::{ConsoleLogger, Logger};

pub const DEFAULT_DIR_MODE: u32 = 0o755;
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Construction options for a store.
///
/// ```rust
/// use std::sync::Arc;
/// use tome_store::{NopLogger, Options};
///
/// let options = Options::default()
///     .with_logger(Arc::new(NopLogger))
///     .with_sync_writes(false);
/// assert!(!options.sync_writes);
/// ```
#[derive(Clone)]
pub struct Options {
    /// Sink for store diagnostics. `None` means a [`ConsoleLogger`] at `Info`.
    pub logger: Option<Arc<dyn Logger>>,
    /// Permission bits for directories the store creates. Ignored off unix.
    pub dir_mode: u32,
    /// Permission bits for resource files. Ignored off unix.
    pub file_mode: u32,
    /// Flush each temp file to disk before it is renamed into place.
    pub sync_writes: bool,
}

impl Options {
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn with_dir_mode(mut self, mode: u32) -> Self {
        self.dir_mode = mode;
        self
    }

    pub fn with_file_mode(mut self, mode: u32) -> Self {
        self.file_mode = mode;
        self
    }

    pub fn with_sync_writes(mut self, sync_writes: bool) -> Self {
        self.sync_writes = sync_writes;
        self
    }

    /// The configured logger, or the default console logger.
    pub fn logger_or_default(&self) -> Arc<dyn Logger> {
        match &self.logger {
            Some(logger) => Arc::clone(logger),
            None => Arc::new(ConsoleLogger::default()),
        }
    }
}

impl Default for Options {
    fn default() -> Self {
        Options {
            logger: None,
            dir_mode: DEFAULT_DIR_MODE,
            file_mode: DEFAULT_FILE_MODE,
            sync_writes: true,
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("logger", &self.logger.as_ref().map(|_| "<dyn Logger>"))
            .field("dir_mode", &format_args!("{:o}", self.dir_mode))
            .field("file_mode", &format_args!("{:o}", self.file_mode))
            .field("sync_writes", &self.sync_writes)
            .finish()
    }
}
