use crate::constants::{DEFAULT_DATA_DIR, DEFAULT_LIST_BOUND, LOG_FILE_NAME};
use crate::policy::{Backend, DuplicatePolicy, GroupAggregation, RootKey};
use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration shared across the tool.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HardenConfigInner {
    pub hive: HiveConfig,
    pub list: ListConfig,
    pub policy: PolicyConfig,
    pub log: LogConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct HardenConfig {
    #[serde(flatten, default)]
    inner: Arc<HardenConfigInner>,
}

impl Deref for HardenConfig {
    type Target = HardenConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for HardenConfig {
    fn deref_mut(&mut self) -> &mut HardenConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Store backend selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HiveConfig {
    pub backend: Backend,
    /// Registry tree used by the registry backend.
    pub root_key: RootKey,
    /// Root directory of the filesystem backend.
    pub data_dir: PathBuf,
}

/// Managed list settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ListConfig {
    pub bound: u32,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub duplicates: DuplicatePolicy,
    pub aggregation: GroupAggregation,
}

/// Logging settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level name (`info`), or directives (`harden_core=debug,warn`) which replace `RUST_LOG`.
    pub level: String,
    /// Directory for rolling log files; console only when unset.
    pub path: Option<PathBuf>,
    pub file_name: String,
    pub json: bool,
    pub max_files: usize,
}

// --- Default ---

impl Default for HiveConfig {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            root_key: RootKey::default(),
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self { bound: DEFAULT_LIST_BOUND }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_owned(),
            path: None,
            file_name: LOG_FILE_NAME.to_owned(),
            json: false,
            max_files: 7,
        }
    }
}
