use crate::error::HiveError;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Longest accepted location segment or entry name, matching the registry limit.
const MAX_NAME_LEN: usize = 255;

/// Validates a single location segment or entry name.
///
/// Names must be non-empty, shorter than 256 characters, free of path separators and
/// control characters, and must not be `.` or `..`.
///
/// # Errors
/// Returns [`HiveError::InvalidName`] describing the first violated rule.
pub fn validate_name(name: &str) -> Result<(), HiveError> {
    let reason = if name.is_empty() {
        "Name cannot be empty"
    } else if name.chars().count() > MAX_NAME_LEN {
        "Name exceeds 255 characters"
    } else if name == "." || name == ".." {
        "Relative names are not allowed"
    } else if name.contains(['\\', '/']) {
        "Name contains a path separator"
    } else if name.chars().any(char::is_control) {
        "Name contains control characters"
    } else {
        return Ok(());
    };

    Err(HiveError::InvalidName { message: name.to_owned().into(), context: Some(reason.into()) })
}

/// Case-folded form of a name, used wherever the store compares names.
pub(crate) fn fold(name: &str) -> String {
    name.to_lowercase()
}

/// A validated location inside a hive, relative to the hive root.
///
/// Segments keep the casing they were created with, but equality and hashing are
/// case-insensitive like the Windows registry. A `KeyPath` always has at least one segment.
///
/// ```rust
/// use harden_hive::KeyPath;
///
/// let list: KeyPath = r"Software\Policies\Explorer\DisallowRun".parse().unwrap();
/// assert_eq!(list.leaf(), "DisallowRun");
/// assert_eq!(list.parent().unwrap().to_string(), r"Software\Policies\Explorer");
/// assert_eq!(list, "software/policies/explorer/disallowrun".parse().unwrap());
/// ```
#[derive(Debug, Clone)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// Parses a path whose segments are separated by `\` or `/`.
    ///
    /// # Errors
    /// Returns [`HiveError::InvalidName`] if the path is empty or any segment is invalid.
    pub fn parse(path: &str) -> Result<Self, HiveError> {
        Self::from_segments(path.split(['\\', '/']))
    }

    /// Builds a path from already split segments.
    ///
    /// # Errors
    /// Returns [`HiveError::InvalidName`] if there are no segments or any segment is invalid.
    pub fn from_segments<I, S>(segments: I) -> Result<Self, HiveError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(HiveError::InvalidName {
                message: "EMPTY".into(),
                context: Some("Location path cannot be empty".into()),
            });
        }
        for segment in &segments {
            validate_name(segment)?;
        }
        Ok(Self { segments })
    }

    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments in the path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    /// The last segment of the path.
    #[must_use]
    pub fn leaf(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// The enclosing location, or `None` for a top-level location.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        (self.segments.len() > 1)
            .then(|| Self { segments: self.segments[..self.segments.len() - 1].to_vec() })
    }

    /// Appends one segment.
    ///
    /// # Errors
    /// Returns [`HiveError::InvalidName`] if the segment is invalid.
    pub fn join(&self, segment: &str) -> Result<Self, HiveError> {
        validate_name(segment)?;
        let mut segments = self.segments.clone();
        segments.push(segment.to_owned());
        Ok(Self { segments })
    }

    /// Whether `self` is a strict ancestor of `other`.
    #[must_use]
    pub fn is_ancestor_of(&self, other: &Self) -> bool {
        other.segments.len() > self.segments.len()
            && self.segments.iter().zip(&other.segments).all(|(a, b)| fold(a) == fold(b))
    }

    /// Every prefix of the path, from the top-level location down to `self`.
    pub fn ancestry(&self) -> impl Iterator<Item = Self> + '_ {
        (1..=self.segments.len()).map(|len| Self { segments: self.segments[..len].to_vec() })
    }

    /// Case-folded, backslash-joined form.
    #[must_use]
    pub fn folded(&self) -> String {
        fold(&self.to_string())
    }
}

impl PartialEq for KeyPath {
    fn eq(&self, other: &Self) -> bool {
        self.segments.len() == other.segments.len()
            && self.segments.iter().zip(&other.segments).all(|(a, b)| fold(a) == fold(b))
    }
}

impl Eq for KeyPath {}

impl Hash for KeyPath {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for segment in &self.segments {
            fold(segment).hash(state);
        }
    }
}

impl FromStr for KeyPath {
    type Err = HiveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for KeyPath {
    type Error = HiveError;

    fn try_from(value: &str) -> Result<Self, HiveError> {
        Self::parse(value)
    }
}

impl TryFrom<String> for KeyPath {
    type Error = HiveError;

    fn try_from(value: String) -> Result<Self, HiveError> {
        Self::parse(&value)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("\\"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_relative_segments() {
        assert!(KeyPath::parse("").is_err());
        assert!(KeyPath::parse(r"Software\\Policies").is_err());
        assert!(KeyPath::parse(r"Software\..\Policies").is_err());
        assert!(KeyPath::parse("Software/./Policies").is_err());
    }

    #[test]
    fn rejects_separator_in_joined_segment() {
        let base = KeyPath::parse("Software").unwrap();
        assert!(base.join(r"a\b").is_err());
        assert_eq!(base.join("Policies").unwrap().to_string(), r"Software\Policies");
    }

    #[test]
    fn top_level_location_has_no_parent() {
        let top = KeyPath::parse("Software").unwrap();
        assert!(top.parent().is_none());
        assert_eq!(top.leaf(), "Software");
    }

    #[test]
    fn ancestry_lists_every_prefix() {
        let path = KeyPath::parse("a/b/c").unwrap();
        let chain: Vec<String> = path.ancestry().map(|p| p.to_string()).collect();
        assert_eq!(chain, vec!["a", r"a\b", r"a\b\c"]);
    }

    #[test]
    fn ancestor_check_is_strict_and_case_insensitive() {
        let parent = KeyPath::parse("Software/Policies").unwrap();
        let child = KeyPath::parse(r"software\POLICIES\Explorer").unwrap();
        assert!(parent.is_ancestor_of(&child));
        assert!(!child.is_ancestor_of(&parent));
        assert!(!parent.is_ancestor_of(&parent));
    }

    #[test]
    fn validate_name_rejects_control_characters() {
        assert!(validate_name("cmd\u{0}.exe").is_err());
        assert!(validate_name("DisallowRun").is_ok());
    }
}
