use crate::error::HiveError;
use crate::path::KeyPath;
use std::path::{Path, PathBuf};

/// Suffix of files holding string entries.
pub(crate) const STRING_SUFFIX: &str = ".sz";
/// Suffix of files holding 32-bit number entries.
pub(crate) const DWORD_SUFFIX: &str = ".dword";
/// Marker embedded in in-flight temporary file names.
pub(crate) const TMP_MARKER: &str = ".hivetmp.";

/// Maps a location to its directory below `root`, refusing anything that escapes the sandbox.
///
/// Segments are already free of separators and relative components, so escaping is only
/// possible through a symlinked directory; the deepest existing ancestor is canonicalized
/// and checked against the root.
pub(crate) fn resolve_location(root: &Path, path: &KeyPath) -> Result<PathBuf, HiveError> {
    let mut dir = root.to_path_buf();
    for segment in path.segments() {
        check_segment(segment)?;
        dir.push(segment);
    }
    validate_within(root, &dir)?;
    Ok(dir)
}

/// A location segment must not be mistaken for an entry file or a temporary file.
fn check_segment(segment: &str) -> Result<(), HiveError> {
    let lower = segment.to_lowercase();
    if lower.ends_with(STRING_SUFFIX) || lower.ends_with(DWORD_SUFFIX) || lower.contains(TMP_MARKER)
    {
        return Err(HiveError::InvalidName {
            message: segment.to_owned().into(),
            context: Some("Location names cannot use reserved entry suffixes".into()),
        });
    }
    Ok(())
}

/// Validates a path that may not exist yet by verifying its deepest existing ancestor.
fn validate_within(root: &Path, joined: &Path) -> Result<(), HiveError> {
    let mut current = Some(joined);

    while let Some(path) = current {
        if path == root {
            return Ok(());
        }

        if path.exists() {
            return match path.canonicalize() {
                Ok(canonical) if canonical.starts_with(root) => Ok(()),
                Ok(canonical) => Err(HiveError::PathTraversalAttempt {
                    message: canonical.display().to_string().into(),
                    context: Some("Existing location is a symlink outside the hive root".into()),
                }),
                Err(e) => Err(HiveError::Io {
                    source: e,
                    context: Some(format!("Failed to verify {}", path.display()).into()),
                }),
            };
        }

        current = path.parent();
    }

    Err(HiveError::PathTraversalAttempt {
        message: joined.display().to_string().into(),
        context: Some("No valid ancestor found within the hive root".into()),
    })
}
