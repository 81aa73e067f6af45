//! Single reversible toggles and the capability every catalog entry exposes.

use crate::context::Context;
use crate::error::HardenError;
use crate::list::{IndexedList, ListError};
use crate::mode::Mode;
use crate::sink::Event;
use harden_domain::policy::DuplicatePolicy;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt::Debug;

/// Display identity and default policy of a catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    name: Cow<'static, str>,
    long_name: Cow<'static, str>,
    description: Cow<'static, str>,
    harden_by_default: bool,
}

impl Identity {
    #[must_use]
    pub const fn new(
        name: &'static str,
        long_name: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            long_name: Cow::Borrowed(long_name),
            description: Cow::Borrowed(description),
            harden_by_default: false,
        }
    }

    /// Identity built from runtime strings.
    #[must_use]
    pub fn owned(
        name: impl Into<String>,
        long_name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: Cow::Owned(name.into()),
            long_name: Cow::Owned(long_name.into()),
            description: Cow::Owned(description.into()),
            harden_by_default: false,
        }
    }

    #[must_use = "Sets whether the entry is applied when only defaults are selected"]
    pub const fn with_harden_by_default(mut self, enabled: bool) -> Self {
        self.harden_by_default = enabled;
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn harden_by_default(&self) -> bool {
        self.harden_by_default
    }
}

/// A reversible toggle over live store state.
///
/// Implementors are immutable descriptors: all effective state is read from the store
/// on demand, so the same value can be queried, applied, and restored any number of times.
pub trait Hardening: Debug + Send + Sync {
    fn identity(&self) -> &Identity;

    fn name(&self) -> &str {
        self.identity().name()
    }

    fn long_name(&self) -> &str {
        self.identity().long_name()
    }

    fn description(&self) -> &str {
        self.identity().description()
    }

    fn harden_by_default(&self) -> bool {
        self.identity().harden_by_default()
    }

    /// Applies (`true`) or restores (`false`) the toggle.
    ///
    /// # Errors
    /// Returns a [`HardenError`] naming the entry that failed.
    fn harden(&self, ctx: &Context<'_>, enable: bool) -> Result<(), HardenError>;

    /// Whether the toggle is currently applied. Never fails: a state that cannot be read
    /// is reported as not hardened.
    fn is_hardened(&self, ctx: &Context<'_>) -> bool;
}

/// A toggle that is hardened while its value is listed in an [`IndexedList`].
#[derive(Debug, Clone)]
pub struct ListItem {
    identity: Identity,
    list: IndexedList,
    value: String,
    duplicates: DuplicatePolicy,
}

impl ListItem {
    #[must_use]
    pub fn new(identity: Identity, list: IndexedList, value: impl Into<String>) -> Self {
        Self { identity, list, value: value.into(), duplicates: DuplicatePolicy::default() }
    }

    #[must_use = "Sets what a repeated apply does"]
    pub const fn with_duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    #[must_use]
    pub const fn list(&self) -> &IndexedList {
        &self.list
    }

    /// Insert first; the flag is only set once the value is listed.
    fn apply(&self, ctx: &Context<'_>) -> Result<(), ListError> {
        let listed = match self.duplicates {
            DuplicatePolicy::Skip => self.list.position(ctx, &self.value)?,
            DuplicatePolicy::Append => None,
        };

        match listed {
            Some(index) => ctx.emit(Event::DuplicateSkipped {
                location: self.list.location().to_string(),
                index,
                value: self.value.clone(),
            }),
            None => {
                self.list.insert(ctx, &self.value)?;
            },
        }

        self.list.set_activation_flag(ctx, true)
    }

    fn restore(&self, ctx: &Context<'_>) -> Result<(), ListError> {
        self.list.remove_by_value(ctx, &self.value).map(|_| ())
    }
}

impl Hardening for ListItem {
    fn identity(&self) -> &Identity {
        &self.identity
    }

    fn harden(&self, ctx: &Context<'_>, enable: bool) -> Result<(), HardenError> {
        let mode = Mode::from_enable(enable);
        let result = if enable { self.apply(ctx) } else { self.restore(ctx) };
        result.map_err(|source| HardenError::Item {
            item: self.identity.name.clone(),
            mode,
            source,
            context: None,
        })
    }

    fn is_hardened(&self, ctx: &Context<'_>) -> bool {
        self.list.contains(ctx, &self.value).unwrap_or_else(|err| {
            ctx.emit(Event::QueryFailed { item: self.name().to_owned(), error: err.to_string() });
            false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_accessors() {
        let id = Identity::new("cmd.exe", "Disable cmd.exe", "Disables cmd.exe")
            .with_harden_by_default(true);
        assert_eq!(id.name(), "cmd.exe");
        assert_eq!(id.long_name(), "Disable cmd.exe");
        assert_eq!(id.description(), "Disables cmd.exe");
        assert!(id.harden_by_default());

        let owned = Identity::owned("x", "y", "z");
        assert_eq!(owned.name(), "x");
        assert!(!owned.harden_by_default());
    }
}
