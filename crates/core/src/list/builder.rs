use crate::list::{IndexedList, ListError};
use harden_domain::constants::DEFAULT_LIST_BOUND;
use harden_hive::{KeyPath, validate_name};
use private::Sealed;

#[derive(Debug, Default)]
pub struct NoLocation;
#[derive(Debug)]
pub struct WithLocation(KeyPath);

mod private {
    pub trait Sealed {}
}
impl Sealed for NoLocation {}
impl Sealed for WithLocation {}

/// Type-state builder for [`IndexedList`]; a location must be set before `build`.
#[allow(private_bounds)]
#[derive(Debug)]
pub struct IndexedListBuilder<S: Sealed = NoLocation> {
    state: S,
    bound: u32,
    flag_name: Option<String>,
}

impl Default for IndexedListBuilder<NoLocation> {
    fn default() -> Self {
        Self { state: NoLocation, bound: DEFAULT_LIST_BOUND, flag_name: None }
    }
}

#[allow(private_bounds)]
impl<S: Sealed> IndexedListBuilder<S> {
    #[must_use = "Sets the largest number of slots the list may hold"]
    pub const fn bound(mut self, bound: u32) -> Self {
        self.bound = bound;
        self
    }

    /// Name of the activation flag entry; defaults to the list location's leaf.
    #[must_use = "Sets the name of the activation flag entry"]
    pub fn flag_name(mut self, name: impl Into<String>) -> Self {
        self.flag_name = Some(name.into());
        self
    }
}

impl IndexedListBuilder<NoLocation> {
    #[must_use = "Creates a new list builder with the default bound"]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "Sets the location that holds the slots"]
    pub fn location(self, location: KeyPath) -> IndexedListBuilder<WithLocation> {
        IndexedListBuilder {
            state: WithLocation(location),
            bound: self.bound,
            flag_name: self.flag_name,
        }
    }
}

impl IndexedListBuilder<WithLocation> {
    /// Validates the settings and builds the list descriptor.
    ///
    /// # Errors
    /// Returns [`ListError::InvalidConfiguration`] if the location has no parent to carry
    /// the activation flag, the bound is zero, or the flag name is not a valid entry name.
    pub fn build(self) -> Result<IndexedList, ListError> {
        let location = self.state.0;

        let Some(flag_location) = location.parent() else {
            return Err(ListError::InvalidConfiguration {
                message: location.to_string().into(),
                context: Some("List location needs a parent for the activation flag".into()),
            });
        };

        if self.bound == 0 {
            return Err(ListError::InvalidConfiguration {
                message: "bound must be greater than zero".into(),
                context: None,
            });
        }

        let flag_name = self.flag_name.unwrap_or_else(|| location.leaf().to_owned());
        validate_name(&flag_name).map_err(|e| ListError::InvalidConfiguration {
            message: e.to_string().into(),
            context: Some("Activation flag name".into()),
        })?;

        Ok(IndexedList { location, flag_location, flag_name, bound: self.bound })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(p: &str) -> KeyPath {
        KeyPath::parse(p).unwrap()
    }

    #[test]
    fn defaults_follow_location() {
        let list = IndexedList::builder().location(path(r"Explorer\DisallowRun")).build().unwrap();
        assert_eq!(list.bound(), 99);
        assert_eq!(list.flag_name(), "DisallowRun");
        assert_eq!(list.flag_location(), &path("Explorer"));
    }

    #[test]
    fn explicit_settings_are_kept() {
        let list = IndexedList::builder()
            .bound(3)
            .flag_name("Active")
            .location(path(r"Explorer\DisallowRun"))
            .build()
            .unwrap();
        assert_eq!(list.bound(), 3);
        assert_eq!(list.flag_name(), "Active");
    }

    #[test]
    fn rejects_invalid_settings() {
        let top = IndexedList::builder().location(path("DisallowRun")).build();
        assert!(matches!(top, Err(ListError::InvalidConfiguration { .. })));

        let zero = IndexedList::builder().location(path(r"Explorer\DisallowRun")).bound(0).build();
        assert!(matches!(zero, Err(ListError::InvalidConfiguration { .. })));

        let flag =
            IndexedList::builder().location(path(r"Explorer\DisallowRun")).flag_name("").build();
        assert!(matches!(flag, Err(ListError::InvalidConfiguration { .. })));
    }
}
