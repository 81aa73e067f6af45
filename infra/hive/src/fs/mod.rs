//! Sandboxed filesystem hive backend.
//!
//! Every location is a directory below the hive root and every entry is a small file next
//! to its sub-locations: `<name>.sz` holds a UTF-8 string, `<name>.dword` holds a decimal
//! number. Writes go through a unique temporary file, `fsync`, and a rename, so an entry is
//! either fully written or absent. Name matching follows the host filesystem.

mod builder;
mod maintenance;
mod security;

pub use builder::{FsHiveBuilder, NoRoot, WithRoot};

use crate::error::{HiveError, HiveErrorExt};
use crate::hive::{Hive, Key, check_writable, key_not_found, value_not_found};
use crate::path::{KeyPath, validate_name};
use crate::value::{Access, Value};
use security::{DWORD_SUFFIX, STRING_SUFFIX, TMP_MARKER};
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// Shared state of an [`FsHive`].
#[derive(Debug)]
pub(crate) struct FsHiveInner {
    /// Canonical directory that contains every location.
    pub(crate) root: PathBuf,
    /// Counter used to generate unique temporary file names.
    pub(crate) tmp_counter: AtomicU64,
}

/// A hive persisted as a directory tree.
///
/// # Example
///
/// ```rust
/// use harden_hive::{FsHive, Hive, KeyPath, Value};
///
/// # let tmp = tempfile::tempdir().unwrap();
/// let hive = FsHive::builder().root(tmp.path().join("hive")).connect().unwrap();
/// let list = KeyPath::parse(r"Explorer\DisallowRun").unwrap();
/// hive.create(&list).unwrap().set("1", &Value::from("cmd.exe")).unwrap();
/// assert!(hive.exists(&list).unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct FsHive {
    pub(crate) inner: Arc<FsHiveInner>,
}

impl FsHive {
    #[must_use = "The hive is not opened until you call .connect()"]
    pub fn builder() -> FsHiveBuilder {
        FsHiveBuilder::new()
    }

    /// The canonical root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    fn dir(&self, path: &KeyPath) -> Result<PathBuf, HiveError> {
        security::resolve_location(&self.inner.root, path)
    }

    fn handle(&self, path: &KeyPath, dir: PathBuf, access: Access) -> Box<dyn Key + '_> {
        Box::new(FsKey { hive: self, path: path.clone(), dir, access })
    }

    /// Writes `data` to `target` atomically.
    fn write_atomic(&self, target: &Path, data: &[u8]) -> Result<(), HiveError> {
        let temp = unique_tmp_path(target, &self.inner.tmp_counter);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .context(format!("Temp creation failed: {}", temp.display()))?;
            file.write_all(data).context("Write failed")?;
            file.sync_all().context("Syncing entry file")?;
        }

        if let Err(err) = fs::rename(&temp, target) {
            if err.kind() == ErrorKind::AlreadyExists {
                fs::remove_file(target)
                    .context(format!("Failed to replace entry: {}", target.display()))?;
                fs::rename(&temp, target).context(format!(
                    "Atomic swap failed: {} -> {}",
                    temp.display(),
                    target.display()
                ))?;
            } else {
                let _ = fs::remove_file(&temp);
                return Err(HiveError::Io {
                    source: err,
                    context: Some(
                        format!("Atomic swap failed: {} -> {}", temp.display(), target.display())
                            .into(),
                    ),
                });
            }
        }

        if let Some(parent) = target.parent() {
            sync_dir(parent);
        }
        Ok(())
    }
}

impl Hive for FsHive {
    fn open(&self, path: &KeyPath, access: Access) -> Result<Box<dyn Key + '_>, HiveError> {
        let dir = self.dir(path)?;
        if !dir.is_dir() {
            return Err(key_not_found(path));
        }
        Ok(self.handle(path, dir, access))
    }

    fn create(&self, path: &KeyPath) -> Result<Box<dyn Key + '_>, HiveError> {
        let dir = self.dir(path)?;
        fs::create_dir_all(&dir).context(format!("Failed to create location: {path}"))?;
        Ok(self.handle(path, dir, Access::ALL))
    }

    fn delete(&self, path: &KeyPath) -> Result<(), HiveError> {
        let dir = self.dir(path)?;
        if !dir.is_dir() {
            return Err(key_not_found(path));
        }
        let has_children = fs::read_dir(&dir)
            .context(format!("Failed to list location: {path}"))?
            .flatten()
            .any(|entry| entry.file_type().is_ok_and(|t| t.is_dir()));
        if has_children {
            return Err(HiveError::KeyNotEmpty { message: path.to_string().into(), context: None });
        }
        fs::remove_dir_all(&dir).context(format!("Failed to delete location: {path}"))?;
        if let Some(parent) = dir.parent() {
            sync_dir(parent);
        }
        debug!(path = %path, "Location deleted");
        Ok(())
    }
}

#[derive(Debug)]
struct FsKey<'h> {
    hive: &'h FsHive,
    path: KeyPath,
    dir: PathBuf,
    access: Access,
}

impl FsKey<'_> {
    fn entry_file(&self, name: &str, suffix: &str) -> PathBuf {
        self.dir.join(format!("{name}{suffix}"))
    }

    fn ensure_present(&self) -> Result<(), HiveError> {
        if self.dir.is_dir() { Ok(()) } else { Err(key_not_found(&self.path)) }
    }
}

impl Key for FsKey<'_> {
    fn path(&self) -> &KeyPath {
        &self.path
    }

    fn get(&self, name: &str) -> Result<Value, HiveError> {
        validate_name(name)?;
        self.ensure_present()?;

        match fs::read(self.entry_file(name, STRING_SUFFIX)) {
            Ok(bytes) => {
                return String::from_utf8(bytes).map(Value::String).map_err(|_| {
                    HiveError::TypeMismatch {
                        message: format!(r"{}\{name}", self.path).into(),
                        context: Some("String entry is not valid UTF-8".into()),
                    }
                });
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {},
            Err(err) => {
                return Err(HiveError::Io {
                    source: err,
                    context: Some(format!(r"Read failed: {}\{name}", self.path).into()),
                });
            },
        }

        match fs::read_to_string(self.entry_file(name, DWORD_SUFFIX)) {
            Ok(text) => text.trim().parse::<u32>().map(Value::Dword).map_err(|_| {
                HiveError::TypeMismatch {
                    message: format!(r"{}\{name}", self.path).into(),
                    context: Some("Number entry is corrupt".into()),
                }
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(value_not_found(&self.path, name)),
            Err(err) => Err(HiveError::Io {
                source: err,
                context: Some(format!(r"Read failed: {}\{name}", self.path).into()),
            }),
        }
    }

    fn set(&self, name: &str, value: &Value) -> Result<(), HiveError> {
        check_writable(self.access, &self.path)?;
        validate_name(name)?;
        self.ensure_present()?;

        let (target, stale, data) = match value {
            Value::String(s) => (STRING_SUFFIX, DWORD_SUFFIX, s.clone().into_bytes()),
            Value::Dword(v) => (DWORD_SUFFIX, STRING_SUFFIX, v.to_string().into_bytes()),
        };
        let target = self.entry_file(name, target);
        self.hive.write_atomic(&target, &data)?;

        match fs::remove_file(self.entry_file(name, stale)) {
            Ok(()) => {},
            Err(err) if err.kind() == ErrorKind::NotFound => {},
            Err(err) => {
                return Err(HiveError::Io {
                    source: err,
                    context: Some(format!(r"Failed to drop previous type of {}\{name}", self.path).into()),
                });
            },
        }

        debug!(path = %target.display(), "Entry saved atomically");
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), HiveError> {
        check_writable(self.access, &self.path)?;
        validate_name(name)?;
        self.ensure_present()?;

        let mut removed = false;
        for suffix in [STRING_SUFFIX, DWORD_SUFFIX] {
            match fs::remove_file(self.entry_file(name, suffix)) {
                Ok(()) => removed = true,
                Err(err) if err.kind() == ErrorKind::NotFound => {},
                Err(err) => {
                    return Err(HiveError::Io {
                        source: err,
                        context: Some(format!(r"Failed to delete {}\{name}", self.path).into()),
                    });
                },
            }
        }

        if removed {
            sync_dir(&self.dir);
            Ok(())
        } else {
            Err(value_not_found(&self.path, name))
        }
    }

    fn names(&self) -> Result<Vec<String>, HiveError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Err(key_not_found(&self.path)),
            Err(err) => {
                return Err(HiveError::Io {
                    source: err,
                    context: Some(format!("Failed to list location: {}", self.path).into()),
                });
            },
        };

        let mut names: Vec<String> = entries
            .flatten()
            .filter(|entry| entry.file_type().is_ok_and(|t| t.is_file()))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .filter(|file| !file.contains(TMP_MARKER))
            .filter_map(|file| {
                file.strip_suffix(STRING_SUFFIX)
                    .or_else(|| file.strip_suffix(DWORD_SUFFIX))
                    .map(str::to_owned)
            })
            .collect();
        names.sort_unstable();
        names.dedup();
        Ok(names)
    }
}

fn unique_tmp_path(target: &Path, counter: &AtomicU64) -> PathBuf {
    let counter = counter.fetch_add(1, Ordering::Relaxed);
    let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("entry");
    target.with_file_name(format!("{file_name}{TMP_MARKER}{counter}"))
}

#[cfg(unix)]
fn sync_dir(path: &Path) {
    match fs::File::open(path) {
        Ok(dir) => {
            if let Err(err) = dir.sync_all() {
                tracing::warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "Directory open failed");
        },
    }
}

#[cfg(not(unix))]
const fn sync_dir(_path: &Path) {}
