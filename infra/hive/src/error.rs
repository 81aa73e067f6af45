use std::borrow::Cow;

/// A specialized [`HiveError`] enum of this crate.
#[harden_derive::harden_error]
pub enum HiveError {
    #[error("Location not found{}: {message}", format_context(.context))]
    KeyNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Entry not found{}: {message}", format_context(.context))]
    ValueNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Location still has sub-locations{}: {message}", format_context(.context))]
    KeyNotEmpty { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Access denied{}: {message}", format_context(.context))]
    AccessDenied { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unexpected entry type{}: {message}", format_context(.context))]
    TypeMismatch { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Invalid name{}: {message}", format_context(.context))]
    InvalidName { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Path traversal security violation{}: {message}", format_context(.context))]
    PathTraversalAttempt { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },
}

impl HiveError {
    /// `true` when the error only says that a location or an entry is absent.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::KeyNotFound { .. } | Self::ValueNotFound { .. })
    }
}
