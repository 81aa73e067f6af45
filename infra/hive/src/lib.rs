//! A hierarchical key-value store abstraction modeled on the Windows registry.
//!
//! A hive is a tree of named locations; every location holds named, typed entries
//! ([`Value::String`] or [`Value::Dword`]). Callers talk to the [`Hive`] and [`Key`]
//! traits only, so the same code runs against any backend.
//!
//! # Backends
//!
//! - **[`MemoryHive`]**: in-process tree, case-insensitive like the registry. Used by tests
//!   and dry runs.
//! - **[`FsHive`]**: a sandboxed directory tree with atomic entry writes and self-healing of
//!   interrupted writes on connect.
//! - **`RegistryHive`** (Windows only): the live registry under `HKEY_CURRENT_USER` or
//!   `HKEY_LOCAL_MACHINE`.
//!
//! # Scoped handles
//!
//! [`Hive::open`] and [`Hive::create`] return boxed [`Key`] handles. Dropping a handle releases
//! it, so early returns and `?` never leak an open location.
//!
//! # Examples
//!
//! ```rust
//! use harden_hive::{Access, Hive, HiveError, KeyPath, MemoryHive, Value};
//!
//! fn main() -> Result<(), HiveError> {
//!     let hive = MemoryHive::new();
//!     let list = KeyPath::parse(r"Software\Policies\Explorer\DisallowRun")?;
//!
//!     let key = hive.create(&list)?;
//!     key.set("1", &Value::from("cmd.exe"))?;
//!     drop(key);
//!
//!     let key = hive.open(&list, Access::READ)?;
//!     assert_eq!(key.get_string("1")?, "cmd.exe");
//!     assert!(key.get("2").unwrap_err().is_not_found());
//!     Ok(())
//! }
//! ```

mod error;
mod fs;
mod hive;
mod memory;
mod path;
#[cfg(windows)]
mod registry;
mod value;

pub use error::{HiveError, HiveErrorExt};
pub use fs::{FsHive, FsHiveBuilder, NoRoot, WithRoot};
pub use hive::{Hive, Key};
pub use memory::MemoryHive;
pub use path::{KeyPath, validate_name};
#[cfg(windows)]
pub use registry::{RegistryHive, Root};
pub use value::{Access, Value};
