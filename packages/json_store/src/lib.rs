//! File-per-record JSON document store.
//!
//! Records live at `<root>/<collection>/<resource>.json`, pretty-printed for human inspection.
//! See [`CollectionStore`] for the concurrency and durability guarantees.

pub mod json_codec;
pub mod local_disk;
pub mod locks;

pub use json_codec::JsonCodec;
pub use local_disk::CollectionStore;
pub use locks::LockRegistry;

pub use tome_store::{Codec, ConsoleLogger, Error, Logger, NopLogger, Options, Result};

/// Version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
