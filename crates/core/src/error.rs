use crate::list::ListError;
use crate::mode::Mode;
use std::borrow::Cow;

/// A specialized [`HardenError`] enum of this crate.
#[harden_derive::harden_error]
pub enum HardenError {
    /// One item's list operation failed.
    #[error("Cannot {mode} '{item}'{}: {source}", format_context(.context))]
    Item { item: Cow<'static, str>, mode: Mode, source: ListError, context: Option<Cow<'static, str>> },

    /// One or more members of a group failed; every member was attempted.
    #[error("Cannot {mode} group '{group}'{}: {}", format_context(.context), format_failures(.failures))]
    Group {
        group: Cow<'static, str>,
        mode: Mode,
        failures: Vec<MemberFailure>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Unknown entry{}: {message}", format_context(.context))]
    UnknownEntry { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Group has no members{}: {message}", format_context(.context))]
    EmptyGroup { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

/// The failure of one group member.
#[derive(Debug)]
pub struct MemberFailure {
    pub member: Cow<'static, str>,
    pub error: HardenError,
}

impl HardenError {
    /// Names of the members that failed; the item itself for item errors.
    #[must_use]
    pub fn failed_members(&self) -> Vec<&str> {
        match self {
            Self::Item { item, .. } => vec![item.as_ref()],
            Self::Group { failures, .. } => failures.iter().map(|f| f.member.as_ref()).collect(),
            _ => Vec::new(),
        }
    }
}

fn format_failures(failures: &[MemberFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("[{}] {}", f.member, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}
