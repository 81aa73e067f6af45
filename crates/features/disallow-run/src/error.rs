use harden_core::{HardenError, ListError};
use harden_hive::HiveError;
use std::borrow::Cow;

/// DisallowRun catalog error type.
#[harden_derive::harden_error]
pub enum DisallowRunError {
    #[error("Invalid list location{}: {source}", format_context(.context))]
    Location { source: HiveError, context: Option<Cow<'static, str>> },

    #[error("Invalid list settings{}: {source}", format_context(.context))]
    List { source: ListError, context: Option<Cow<'static, str>> },

    #[error("Invalid catalog entry{}: {source}", format_context(.context))]
    Entry { source: HardenError, context: Option<Cow<'static, str>> },
}
