//! Command-line front end of the hardening tool.
//!
//! Argument parsing lives in [`args`]; [`handlers`] turn a parsed command into rendered
//! output and a success flag.

pub mod args;
pub mod handlers;

pub use crate::args::{Cli, Command};
pub use crate::handlers::{Output, dispatch, resolve_config};
