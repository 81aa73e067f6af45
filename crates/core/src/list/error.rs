use harden_hive::HiveError;
use std::borrow::Cow;

/// Failures of [`IndexedList`](super::IndexedList) operations.
#[harden_derive::harden_error]
pub enum ListError {
    /// Opening or creating a location failed.
    #[error("Store access failed{}: {source}", format_context(.context))]
    StoreAccess { source: HiveError, context: Option<Cow<'static, str>> },

    /// Reading, writing, or deleting an entry failed after its location was opened.
    #[error("Store value operation failed{}: {source}", format_context(.context))]
    StoreValue { source: HiveError, context: Option<Cow<'static, str>> },

    /// Every index up to the bound is taken.
    #[error("List is full{}: {location} already holds {bound} entries", format_context(.context))]
    StoreFull { location: Cow<'static, str>, bound: u32, context: Option<Cow<'static, str>> },

    /// A restore stopped after it had started changing the list; contiguity may be broken.
    #[error("Restore left the list incomplete{}: {source}", format_context(.context))]
    RestoreIncomplete { source: HiveError, context: Option<Cow<'static, str>> },

    #[error("Invalid list configuration{}: {message}", format_context(.context))]
    InvalidConfiguration { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl ListError {
    pub(crate) fn value(source: HiveError, context: impl Into<Cow<'static, str>>) -> Self {
        Self::StoreValue { source, context: Some(context.into()) }
    }

    /// Re-labels a store failure that happened mid-restore.
    pub(crate) fn into_incomplete(self) -> Self {
        match self {
            Self::StoreAccess { source, context } | Self::StoreValue { source, context } => {
                Self::RestoreIncomplete { source, context }
            },
            other => other,
        }
    }
}
