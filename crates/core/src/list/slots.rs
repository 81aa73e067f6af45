use std::collections::BTreeMap;

/// Entry name of the slot at `index`.
#[must_use]
pub fn slot_name(index: u32) -> String {
    index.to_string()
}

/// Index encoded by an entry name, if the name is a slot name.
///
/// Only canonical decimal forms of positive integers count: `"1"` and `"42"` are slots,
/// `"0"`, `"01"`, `"+1"`, and `"DisallowRun"` are not.
#[must_use]
pub fn parse_slot_name(name: &str) -> Option<u32> {
    let canonical = !name.is_empty()
        && name.bytes().all(|b| b.is_ascii_digit())
        && !name.starts_with('0');
    if !canonical {
        return None;
    }
    name.parse().ok()
}

/// The occupied slots of one list, keyed by index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slots(BTreeMap<u32, String>);

impl Slots {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: u32) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    /// `(index, value)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> {
        self.0.iter().map(|(i, v)| (*i, v.as_str()))
    }

    /// Values in ascending index order.
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    /// Lowest index holding `value`.
    #[must_use]
    pub fn position(&self, value: &str) -> Option<u32> {
        self.iter().find_map(|(i, v)| (v == value).then_some(i))
    }

    /// Smallest index in `1..=bound` that is not occupied, found in one pass over the keys.
    #[must_use]
    pub fn first_free(&self, bound: u32) -> Option<u32> {
        let mut candidate = 1u32;
        for &index in self.0.keys() {
            if index > candidate {
                break;
            }
            if index == candidate {
                candidate = candidate.checked_add(1)?;
            }
        }
        (candidate <= bound).then_some(candidate)
    }

    /// Whether the occupied indices are exactly `1..=len`.
    #[must_use]
    pub fn is_contiguous(&self) -> bool {
        self.0.keys().copied().eq(1..=u32::try_from(self.0.len()).unwrap_or(u32::MAX))
    }

    pub(crate) fn insert(&mut self, index: u32, value: String) {
        self.0.insert(index, value);
    }

    /// Splits into the slots holding `value` and the rest, both in ascending index order.
    pub(crate) fn partition(self, value: &str) -> (Vec<(u32, String)>, Vec<(u32, String)>) {
        self.0.into_iter().partition(|(_, v)| v == value)
    }
}

impl FromIterator<(u32, String)> for Slots {
    fn from_iter<I: IntoIterator<Item = (u32, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
