//! Catalog entries backed by the Explorer `DisallowRun` policy list.
//!
//! Explorer refuses to start any executable whose file name is listed under
//! `...\Policies\Explorer\DisallowRun` while the `DisallowRun` flag one level up is set.
//! Every entry here shares that one list.
mod error;

pub use crate::error::{DisallowRunError, DisallowRunErrorExt};

use harden_core::{Hardening, HardeningGroup, Identity, IndexedList, ListItem};
use harden_hive::KeyPath;
use harden_kernel::domain::config::HardenConfig;
use harden_kernel::domain::constants::DISALLOW_RUN_PATH;
use harden_kernel::domain::policy::{DuplicatePolicy, GroupAggregation};

pub const CMD_EXECUTABLES: &[&str] = &["cmd.exe"];
pub const POWERSHELL_EXECUTABLES: &[&str] = &["powershell.exe", "powershell_ise.exe"];

/// The shared list plus the policies every entry built from it inherits.
#[derive(Debug, Clone)]
pub struct DisallowRun {
    list: IndexedList,
    duplicates: DuplicatePolicy,
    aggregation: GroupAggregation,
}

impl DisallowRun {
    /// Builds the list descriptor from the configured bound and policies.
    ///
    /// # Errors
    /// Returns [`DisallowRunError::List`] if the configured bound is zero.
    pub fn from_config(config: &HardenConfig) -> Result<Self, DisallowRunError> {
        let location = KeyPath::parse(DISALLOW_RUN_PATH).context("Parsing DisallowRun location")?;
        let list = IndexedList::builder()
            .location(location)
            .bound(config.list.bound)
            .build()
            .context("Building DisallowRun list")?;

        Ok(Self {
            list,
            duplicates: config.policy.duplicates,
            aggregation: config.policy.aggregation,
        })
    }

    #[must_use]
    pub const fn list(&self) -> &IndexedList {
        &self.list
    }

    /// "cmd.exe": blocks the command prompt. Opt-in.
    ///
    /// # Errors
    /// Returns [`DisallowRunError::Entry`] if the group cannot be assembled.
    pub fn cmd(&self) -> Result<HardeningGroup, DisallowRunError> {
        self.group(Identity::new("cmd.exe", "Disable cmd.exe", "Disables cmd.exe"), CMD_EXECUTABLES)
    }

    /// "PowerShell": blocks both PowerShell hosts. Applied by default.
    ///
    /// # Errors
    /// Returns [`DisallowRunError::Entry`] if the group cannot be assembled.
    pub fn powershell(&self) -> Result<HardeningGroup, DisallowRunError> {
        self.group(
            Identity::new(
                "PowerShell",
                "Disable PowerShell",
                "Disables PowerShell and PowerShell ISE",
            )
            .with_harden_by_default(true),
            POWERSHELL_EXECUTABLES,
        )
    }

    /// Every entry compiled in, in catalog order.
    ///
    /// # Errors
    /// Returns the first entry that cannot be assembled.
    pub fn entries(&self) -> Result<Vec<Box<dyn Hardening>>, DisallowRunError> {
        let mut entries: Vec<Box<dyn Hardening>> = Vec::new();

        #[cfg(feature = "cmd")]
        entries.push(Box::new(self.cmd()?));

        #[cfg(feature = "powershell")]
        entries.push(Box::new(self.powershell()?));

        tracing::debug!(count = entries.len(), location = %self.list.location(), "DisallowRun entries built");
        Ok(entries)
    }

    fn group(
        &self,
        identity: Identity,
        executables: &[&'static str],
    ) -> Result<HardeningGroup, DisallowRunError> {
        let members = executables
            .iter()
            .map(|&exe| {
                let item = ListItem::new(Identity::new(exe, exe, exe), self.list.clone(), exe)
                    .with_duplicates(self.duplicates);
                Box::new(item) as Box<dyn Hardening>
            })
            .collect();

        Ok(HardeningGroup::new(identity, members)?.with_aggregation(self.aggregation))
    }
}
