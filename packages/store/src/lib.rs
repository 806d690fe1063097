//! Shared vocabulary for tome document stores.
//!
//! A tome store keeps one serialized record per file, grouped into collection directories under
//! a single root. This crate holds the pieces every backend agrees on:
//!
//! - [`Error`]: the failure taxonomy returned by every store operation
//! - [`Codec`]: how records become bytes and back
//! - [`Logger`]: the injected diagnostics sink, with [`ConsoleLogger`] as the default
//! - [`Options`]: construction-time configuration
//! - [`validate_name`]: the rules collection and resource names must follow

pub mod codec;
pub mod error;
pub mod logger;
pub mod name;
pub mod options;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_suite;

pub use codec::Codec;
pub use error::{Error, Result};
pub use logger::{ConsoleLogger, Logger, NopLogger, LOG_TARGET};
pub use name::{validate_name, NameKind};
pub use options::Options;

#[cfg(any(test, feature = "test-utils"))]
pub use logger::{Level, RecordingLogger};
