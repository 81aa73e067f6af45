//! # Hardening Core
//!
//! Reversible operating-system toggles built on a hierarchical key-value store.
//!
//! ## Architecture
//!
//! Leaf first:
//!
//! 1.  **[`IndexedList`]**: a contiguous, 1-based list of string slots under one store
//!     location, plus an activation flag one level up.
//! 2.  **[`ListItem`]**: one toggle that is hardened while its value is listed.
//! 3.  **[`HardeningGroup`]**: several toggles under one name; runs all of them and
//!     aggregates failures.
//! 4.  **[`Orchestrator`]**: walks a catalog of [`Hardening`] entries, reports state, and
//!     applies or restores a selection without ever aborting the batch.
//!
//! Every operation takes a [`Context`] carrying the store and the event [`Sink`]; nothing in
//! this crate holds global state.
//!
//! ## Example
//!
//! ```rust
//! use harden_core::{Context, Hardening, Identity, IndexedList, ListItem, RecordingSink};
//! use harden_hive::{KeyPath, MemoryHive};
//!
//! let hive = MemoryHive::new();
//! let sink = RecordingSink::new();
//! let ctx = Context::new(&hive, &sink);
//!
//! let list = IndexedList::builder()
//!     .location(KeyPath::parse(r"Explorer\DisallowRun").unwrap())
//!     .build()
//!     .unwrap();
//! let cmd = ListItem::new(Identity::new("cmd.exe", "Disable cmd.exe", "Disables cmd.exe"), list, "cmd.exe");
//!
//! cmd.harden(&ctx, true).unwrap();
//! assert!(cmd.is_hardened(&ctx));
//! cmd.harden(&ctx, false).unwrap();
//! assert!(!cmd.is_hardened(&ctx));
//! ```

mod context;
mod error;
mod group;
mod item;
pub mod list;
mod mode;
pub mod orchestrator;
mod sink;

pub use crate::context::Context;
pub use crate::error::{HardenError, HardenErrorExt, MemberFailure};
pub use crate::group::HardeningGroup;
pub use crate::item::{Hardening, Identity, ListItem};
pub use crate::list::{IndexedList, ListError, RemoveOutcome, Slots};
pub use crate::mode::Mode;
pub use crate::orchestrator::{Orchestrator, Report, Selection, Status};
pub use crate::sink::{Event, NullSink, RecordingSink, Sink, TracingSink};
