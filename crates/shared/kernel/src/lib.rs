//! Kernel utilities shared across crates.
//! Keep this crate lightweight; it owns layered configuration loading and re-exports the domain.
//!
//! ## Config loading
//! ```rust,no_run
//! use harden_kernel::config::load_config;
//! use harden_kernel::domain::config::HardenConfig;
//!
//! let cfg: HardenConfig = load_config(Some("hardentools.toml")).unwrap();
//! println!("list bound: {}", cfg.list.bound);
//! ```
pub mod config;

pub use harden_domain as domain;
