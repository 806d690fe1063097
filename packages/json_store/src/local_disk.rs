use std::ffi::OsStr;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use tome_store::{validate_name, Codec, Error, Logger, NameKind, Options, Result};

use crate::json_codec::JsonCodec;
use crate::locks::{self, LockRegistry};

const TEMP_SUFFIX: &str = "tmp";

/// A document store keeping one encoded record per file.
///
/// Layout on disk is `<root>/<collection>/<resource>.<ext>`, where `ext` comes from the codec
/// (`json` by default).
///
/// Mutations (`write`, `delete`) on the same collection are serialized through a per-collection
/// lock; mutations on different collections run in parallel. Reads take no lock. Every write goes
/// to a sibling temp file which is then renamed over the target, so a reader sees either the old
/// or the new record in full. That guarantee holds only on filesystems where rename over an
/// existing file is atomic. A write that fails after the temp file is created leaves
/// `<resource>.<ext>.tmp` behind; it is never returned by `read_all` and is overwritten by the
/// next write to the same resource.
///
/// # Example
///
/// ```rust
/// use serde::{Deserialize, Serialize};
/// use tome_json_store::CollectionStore;
/// use tome_store::Options;
///
/// #[derive(Serialize, Deserialize, PartialEq, Debug)]
/// struct User {
///     name: String,
///     age: String,
/// }
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = CollectionStore::new(dir.path(), Options::default()).unwrap();
///
/// let alice = User { name: "alice".to_string(), age: "24".to_string() };
/// store.write("users", "alice", &alice).unwrap();
///
/// let read: User = store.read("users", "alice").unwrap();
/// assert_eq!(read, alice);
/// ```
pub struct CollectionStore<C: Codec = JsonCodec> {
    root: PathBuf,
    codec: C,
    locks: LockRegistry,
    logger: Arc<dyn Logger>,
    dir_mode: u32,
    file_mode: u32,
    sync_writes: bool,
}

impl CollectionStore<JsonCodec> {
    /// Opens a JSON store at `root`, creating the directory (and parents) if it is missing.
    pub fn new(root: impl AsRef<Path>, options: Options) -> Result<Self> {
        Self::with_codec(root, JsonCodec, options)
    }
}

impl<C: Codec> CollectionStore<C> {
    pub fn with_codec(root: impl AsRef<Path>, codec: C, options: Options) -> Result<Self> {
        let root = root.as_ref();
        let logger = options.logger_or_default();

        if root.exists() {
            logger.debug(format_args!(
                "Using '{}' (database already exists)",
                root.display()
            ));
        } else {
            logger.debug(format_args!("Creating the database at '{}'", root.display()));
            create_dir_all(root, options.dir_mode).map_err(|error| Error::RootPathInvalid {
                path: root.to_path_buf(),
                error,
            })?;
        }

        let attr = fs::metadata(root).map_err(|error| Error::RootPathInvalid {
            path: root.to_path_buf(),
            error,
        })?;

        if !attr.is_dir() {
            return Err(Error::RootPathInvalid {
                path: root.to_path_buf(),
                error: io::Error::other("Root path must be a directory."),
            });
        }

        if attr.permissions().readonly() {
            return Err(Error::RootPathInvalid {
                path: root.to_path_buf(),
                error: io::Error::other("Root directory must be writable"),
            });
        }

        let root = root
            .canonicalize()
            .map_err(|error| Error::RootPathInvalid {
                path: root.to_path_buf(),
                error,
            })?;

        Ok(CollectionStore {
            root,
            codec,
            locks: LockRegistry::new(),
            logger,
            dir_mode: options.dir_mode,
            file_mode: options.file_mode,
            sync_writes: options.sync_writes,
        })
    }

    /// The canonicalized root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// Creates or replaces `resource` in `collection`.
    ///
    /// The record is encoded before anything on disk is touched, so an encoding failure leaves
    /// the store unchanged.
    pub fn write<RecordType: Serialize + ?Sized>(
        &self,
        collection: &str,
        resource: &str,
        record: &RecordType,
    ) -> Result<()> {
        validate_name(NameKind::Collection, collection)?;
        validate_name(NameKind::Resource, resource)?;

        let bytes = self
            .codec
            .encode(record)
            .map_err(|err| self.report("write", err))?;

        let lock = self.locks.get_or_create(collection);
        let _guard = locks::acquire(&lock);

        let dir = self.collection_path(collection);
        create_dir_all(&dir, self.dir_mode)
            .map_err(|err| self.report("write", Error::io(&dir, err)))?;

        let final_path = self.resource_path(collection, resource);
        let tmp_path = self.temp_path(collection, resource);
        self.logger
            .debug(format_args!("Writing {}...", final_path.display()));

        self.write_temp(&tmp_path, &bytes)
            .map_err(|err| self.report("write", Error::io(&tmp_path, err)))?;
        fs::rename(&tmp_path, &final_path)
            .map_err(|err| self.report("write", Error::io(&final_path, err)))?;

        if self.sync_writes {
            sync_dir(&dir).map_err(|err| self.report("write", Error::io(&dir, err)))?;
        }

        Ok(())
    }

    /// Reads and decodes `resource` from `collection`.
    pub fn read<RecordType: DeserializeOwned>(
        &self,
        collection: &str,
        resource: &str,
    ) -> Result<RecordType> {
        validate_name(NameKind::Collection, collection)?;
        validate_name(NameKind::Resource, resource)?;

        let path = self.resource_path(collection, resource);
        self.logger.trace(format_args!("Reading {}...", path.display()));

        let bytes = fs::read(&path).map_err(|err| self.report("read", Error::io(&path, err)))?;
        self.codec
            .decode(&bytes)
            .map_err(|err| self.report("read", err))
    }

    /// Returns the raw encoded contents of every resource in `collection`.
    ///
    /// Order follows directory enumeration and is not stable. Temp files and anything else
    /// without the codec's extension are skipped. The first unreadable file aborts the call.
    pub fn read_all(&self, collection: &str) -> Result<Vec<Vec<u8>>> {
        validate_name(NameKind::Collection, collection)?;

        let dir = self.collection_path(collection);
        self.logger.trace(format_args!("Reading all of {}...", dir.display()));

        let attr = fs::metadata(&dir).map_err(|err| self.report("read_all", Error::io(&dir, err)))?;
        if !attr.is_dir() {
            return Err(self.report("read_all", Error::NotFound { path: dir }));
        }

        let mut records = Vec::new();
        for entry in walkdir::WalkDir::new(&dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|err| {
                let path = err.path().map_or_else(|| dir.clone(), Path::to_path_buf);
                self.report("read_all", Error::io(path, io::Error::from(err)))
            })?;

            if !entry.file_type().is_file() || !self.is_resource_file(entry.path()) {
                continue;
            }

            let bytes = fs::read(entry.path())
                .map_err(|err| self.report("read_all", Error::io(entry.path(), err)))?;
            records.push(bytes);
        }

        Ok(records)
    }

    /// [`read_all`](Self::read_all), decoding each record as `RecordType`.
    pub fn read_all_as<RecordType: DeserializeOwned>(
        &self,
        collection: &str,
    ) -> Result<Vec<RecordType>> {
        self.read_all(collection)?
            .iter()
            .map(|bytes| {
                self.codec
                    .decode(bytes)
                    .map_err(|err| self.report("read_all", err))
            })
            .collect()
    }

    /// Removes `resource` from `collection`.
    ///
    /// An empty `resource` addresses the collection directory itself, which is removed along
    /// with everything in it. More generally, a target that resolves to a directory is removed
    /// recursively and one that resolves to a resource file removes that file.
    pub fn delete(&self, collection: &str, resource: &str) -> Result<()> {
        validate_name(NameKind::Collection, collection)?;
        if !resource.is_empty() {
            validate_name(NameKind::Resource, resource)?;
        }

        let lock = self.locks.get_or_create(collection);
        let _guard = locks::acquire(&lock);

        let target = if resource.is_empty() {
            self.collection_path(collection)
        } else {
            self.collection_path(collection).join(resource)
        };

        if target.is_dir() {
            if resource.is_empty() {
                self.logger.warn(format_args!(
                    "Removing collection '{}' and all of its resources",
                    collection
                ));
            } else {
                self.logger
                    .debug(format_args!("Removing directory {}...", target.display()));
            }
            return fs::remove_dir_all(&target)
                .map_err(|err| self.report("delete", Error::io(&target, err)));
        }

        if !resource.is_empty() {
            let file = self.resource_path(collection, resource);
            if file.is_file() {
                self.logger.debug(format_args!("Removing {}...", file.display()));
                return fs::remove_file(&file)
                    .map_err(|err| self.report("delete", Error::io(&file, err)));
            }
        }

        Err(self.report("delete", Error::NotFound { path: target }))
    }

    fn collection_path(&self, collection: &str) -> PathBuf {
        self.root.join(collection)
    }

    fn resource_path(&self, collection: &str, resource: &str) -> PathBuf {
        self.collection_path(collection)
            .join(format!("{}.{}", resource, self.codec.extension()))
    }

    fn temp_path(&self, collection: &str, resource: &str) -> PathBuf {
        self.collection_path(collection).join(format!(
            "{}.{}.{}",
            resource,
            self.codec.extension(),
            TEMP_SUFFIX
        ))
    }

    fn is_resource_file(&self, path: &Path) -> bool {
        path.extension() == Some(OsStr::new(self.codec.extension()))
    }

    fn write_temp(&self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(self.file_mode);
        }

        let mut f = options.open(path)?;
        f.write_all(bytes)?;
        if self.sync_writes {
            f.sync_all()?;
        }
        Ok(())
    }

    /// Logs `err` on its way back to the caller.
    fn report(&self, operation: &str, err: Error) -> Error {
        match &err {
            Error::NotFound { .. } | Error::InvalidArgument { .. } => {
                self.logger.debug(format_args!("{} failed: {}", operation, err))
            }
            _ => self.logger.error(format_args!("{} failed: {}", operation, err)),
        }
        err
    }
}

fn create_dir_all(path: &Path, mode: u32) -> io::Result<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(mode);
    }
    #[cfg(not(unix))]
    let _ = mode;
    builder.create(path)
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir)?.sync_all()
}

// Directory handles cannot be synced off unix; the rename is as durable as the platform makes it.
#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
