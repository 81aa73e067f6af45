//! # Domain Models
//!
//! This crate contains pure configuration and policy types with a single dependency (`serde`).
//! Keep it lean: no I/O or store access, just data and simple helpers.

pub mod config;
pub mod constants;
pub mod policy;
