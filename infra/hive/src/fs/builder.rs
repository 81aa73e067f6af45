use crate::error::{HiveError, HiveErrorExt};
use crate::fs::{FsHive, FsHiveInner, maintenance};
use private::Sealed;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tracing::info;

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

#[allow(private_bounds)]
#[derive(Debug)]
pub struct FsHiveBuilder<S: Sealed = NoRoot> {
    state: S,
    create: bool,
}

impl Default for FsHiveBuilder<NoRoot> {
    fn default() -> Self {
        Self { state: NoRoot, create: true }
    }
}

#[allow(private_bounds)]
impl<S: Sealed> FsHiveBuilder<S> {
    #[must_use = "Sets whether the hive root should be created if it does not exist"]
    pub const fn create(mut self, enable: bool) -> Self {
        self.create = enable;
        self
    }
}

impl FsHiveBuilder<NoRoot> {
    #[must_use = "Creates a new hive builder with default configuration"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the root directory of the hive"]
    pub fn root(self, path: impl Into<PathBuf>) -> FsHiveBuilder<WithRoot> {
        FsHiveBuilder { state: WithRoot(path.into()), create: self.create }
    }
}

impl FsHiveBuilder<WithRoot> {
    /// Opens the hive rooted at the configured directory.
    ///
    /// The root is created when `create(true)` (the default) is set, canonicalized so
    /// that symlinked locations can be detected, and swept for temporary files left by
    /// interrupted writes.
    ///
    /// # Errors
    ///
    /// Returns [`HiveError::Io`] if the root does not exist and `create` is false, or if
    /// it cannot be created or resolved.
    pub fn connect(self) -> Result<FsHive, HiveError> {
        let root = &self.state.0;

        if self.create {
            fs::create_dir_all(root)
                .context(format!("Failed to bootstrap hive root: {}", root.display()))?;
            info!(path = %root.display(), "Bootstrapped hive root directory");
        }

        let canonical = fs::canonicalize(root)
            .context(format!("Failed to resolve hive root: {}", root.display()))?;

        maintenance::purge_tmp(&canonical);

        Ok(FsHive {
            inner: Arc::new(FsHiveInner { root: canonical, tmp_counter: AtomicU64::new(1) }),
        })
    }
}
