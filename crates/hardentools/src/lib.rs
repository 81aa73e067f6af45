//! Facade crate for the hardening tool.
//! Re-exports the shared crates and composes the catalog and the store from one configuration.
//! Keep this crate thin: it should compose other crates, not implement business logic.
//!
//! ## Usage
//! - Enable catalog entries with the `cmd` / `powershell` features (both on by default).
//! - Call [`open_hive`] and [`catalog`], then drive the returned [`Orchestrator`](engine::Orchestrator).

mod error;

pub use crate::error::{HardenToolsError, HardenToolsErrorExt};
pub use harden_core as engine;
pub use harden_hive as hive;
pub use harden_kernel as kernel;
pub use harden_kernel::domain;

use domain::config::HardenConfig;
use domain::policy::Backend;
use harden_core::Orchestrator;
use harden_disallow_run::DisallowRun;
use harden_hive::{FsHive, Hive, MemoryHive};
use tracing::{debug, info};

/// Catalog entries compiled into this build.
pub mod features {
    pub use harden_disallow_run as disallow_run;

    /// Build-time enabled entries (by Cargo feature).
    pub const ENABLED: &[&str] = &[
        #[cfg(feature = "cmd")]
        "cmd",
        #[cfg(feature = "powershell")]
        "powershell",
    ];

    #[must_use]
    pub fn is_enabled(name: &str) -> bool {
        ENABLED.contains(&name)
    }
}

/// Builds the orchestrator over every compiled-in entry, in catalog order.
///
/// # Errors
/// Returns [`HardenToolsError::Catalog`] if the configured list settings are invalid.
pub fn catalog(config: &HardenConfig) -> Result<Orchestrator, HardenToolsError> {
    let entries = DisallowRun::from_config(config)
        .and_then(|disallow| disallow.entries())
        .context("DisallowRun")?;
    debug!(entries = entries.len(), features = ?features::ENABLED, "Catalog built");
    Ok(Orchestrator::new(entries))
}

/// Opens the store selected by `hive.backend`.
///
/// # Errors
/// Returns [`HardenToolsError::Store`] if the filesystem root cannot be prepared, or
/// [`HardenToolsError::UnsupportedBackend`] when the registry is requested off Windows.
pub fn open_hive(config: &HardenConfig) -> Result<Box<dyn Hive>, HardenToolsError> {
    let backend = config.hive.backend;
    let hive: Box<dyn Hive> = match backend {
        Backend::Memory => Box::new(MemoryHive::new()),
        Backend::Fs => {
            let data_dir = &config.hive.data_dir;
            let hive = FsHive::builder()
                .root(data_dir)
                .create(true)
                .connect()
                .context(format!("Data directory {}", data_dir.display()))?;
            Box::new(hive)
        },
        Backend::Registry => registry(config)?,
    };

    info!(%backend, "Store opened");
    Ok(hive)
}

#[cfg(windows)]
fn registry(config: &HardenConfig) -> Result<Box<dyn Hive>, HardenToolsError> {
    use domain::policy::RootKey;
    use harden_hive::{RegistryHive, Root};

    let root = match config.hive.root_key {
        RootKey::CurrentUser => Root::CurrentUser,
        RootKey::LocalMachine => Root::LocalMachine,
    };
    Ok(Box::new(RegistryHive::new(root)))
}

#[cfg(not(windows))]
fn registry(config: &HardenConfig) -> Result<Box<dyn Hive>, HardenToolsError> {
    Err(HardenToolsError::UnsupportedBackend {
        message: format!("registry ({}) is only available on Windows", config.hive.root_key).into(),
        context: None,
    })
}
