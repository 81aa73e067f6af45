//! Policy knobs that decide behavior the store itself leaves open.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// What a repeated apply does when the item's value is already listed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Check membership first; an already listed value only re-asserts the activation flag.
    #[default]
    Skip,
    /// Always insert, so a repeated apply leaves two identical slots.
    Append,
}

/// How a group derives its hardened state from its members.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupAggregation {
    /// Hardened iff every member is hardened.
    #[default]
    All,
    /// Hardened iff at least one member is hardened.
    Any,
}

impl GroupAggregation {
    /// Folds member states into the group state.
    pub fn combine(self, mut states: impl Iterator<Item = bool>) -> bool {
        match self {
            Self::All => states.all(|s| s),
            Self::Any => states.any(|s| s),
        }
    }
}

/// Store backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// The live Windows registry.
    Registry,
    /// A directory tree under `hive.data_dir`.
    Fs,
    /// A throwaway in-process tree.
    Memory,
}

impl Default for Backend {
    fn default() -> Self {
        if cfg!(windows) { Self::Registry } else { Self::Fs }
    }
}

impl Backend {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Registry => "registry",
            Self::Fs => "fs",
            Self::Memory => "memory",
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "registry" => Ok(Self::Registry),
            "fs" => Ok(Self::Fs),
            "memory" => Ok(Self::Memory),
            other => Err(format!("unknown backend '{other}' (expected registry, fs or memory)")),
        }
    }
}

/// Predefined registry tree the registry backend is rooted at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RootKey {
    #[default]
    CurrentUser,
    LocalMachine,
}

impl fmt::Display for RootKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CurrentUser => "HKEY_CURRENT_USER",
            Self::LocalMachine => "HKEY_LOCAL_MACHINE",
        })
    }
}
