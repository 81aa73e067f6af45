use harden_disallow_run::DisallowRunError;
use harden_hive::HiveError;
use std::borrow::Cow;

/// Facade error type.
#[harden_derive::harden_error]
pub enum HardenToolsError {
    #[error("Cannot open store{}: {source}", format_context(.context))]
    Store { source: HiveError, context: Option<Cow<'static, str>> },

    #[error("Cannot build catalog{}: {source}", format_context(.context))]
    Catalog { source: DisallowRunError, context: Option<Cow<'static, str>> },

    #[error("Unsupported backend{}: {message}", format_context(.context))]
    UnsupportedBackend { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
