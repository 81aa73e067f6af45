#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by every crate of the hardening workspace.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! harden-derive.workspace = true
//! thiserror.workspace = true
//! ```
//!
//! The generated code refers to `::thiserror`, so consumers must depend on it directly.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for the error enums of the workspace.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `...Ext` trait that adds `.context()`
///   to `Result<T, Self>` and to results of every wrapped source error.
/// * **Standard Conversions**: Implements `From<Source>` for variants that hold exactly
///   a source field and a `context` field, enabling the `?` operator.
/// * **Internal Fallback**: Provides `From<&'static str>` and `From<String>` when an
///   `Internal { message, context }` variant is present.
///
/// # Requirements
///
/// 1. The macro must be applied to an **enum**.
/// 2. Variants that support context must include a `context: Option<Cow<'static, str>>` field.
/// 3. Variants wrapping another error must name the field `source` or mark it with
///    `#[source]`/`#[from]`, and must carry a `context` field.
/// 4. Tuple or unit variants are rejected.
///
/// # Conversions
///
/// When several variants wrap the same source type, only the first one in declaration
/// order receives the `From` conversion and the source-level `.context()`. Variants with
/// fields beyond `source` and `context` never receive one; build them explicitly.
///
/// # Example
///
/// ```rust,ignore
/// use harden_derive::harden_error;
/// use std::borrow::Cow;
///
/// #[harden_error]
/// pub enum LoaderError {
///     #[error("IO error{}: {source}", format_context(.context))]
///     Io { source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Rejected {path}{}: {source}", format_context(.context))]
///     Rejected { path: String, source: std::io::Error, context: Option<Cow<'static, str>> },
///
///     #[error("Internal fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn load(path: &str) -> Result<Vec<u8>, LoaderError> {
///     std::fs::read(path).context("Reading profile") // becomes LoaderError::Io
/// }
/// ```
#[proc_macro_attribute]
pub fn harden_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand_derive(input).into()
}
