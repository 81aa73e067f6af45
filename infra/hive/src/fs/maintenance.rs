use crate::fs::security::TMP_MARKER;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tracing::{info, warn};
use walkdir::{DirEntry, WalkDir};

/// Temporary files younger than this may still belong to a live writer.
const STALE_AFTER: Duration = Duration::from_secs(300);

/// Removes temporary files left behind by interrupted writes.
///
/// Empty directories are kept: in this backend they are locations without entries.
pub(crate) fn purge_tmp(root: &Path) {
    let (removed, failed) = remove_stale(root, SystemTime::now(), STALE_AFTER);
    if removed > 0 || failed > 0 {
        info!(removed, failed, "Cleaned up temporary entry files");
    }
}

fn remove_stale(root: &Path, now: SystemTime, threshold: Duration) -> (usize, usize) {
    let mut removed = 0;
    let mut failed = 0;

    WalkDir::new(root)
        .into_iter()
        .flatten()
        .filter(|entry| is_tmp(entry) && is_stale(entry, now, threshold))
        .for_each(|entry| match std::fs::remove_file(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => {
                warn!(path = %entry.path().display(), error = %e, "Temporary file removal failed");
                failed += 1;
            },
        });

    (removed, failed)
}

fn is_tmp(entry: &DirEntry) -> bool {
    entry.file_type().is_file()
        && entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER))
}

fn is_stale(entry: &DirEntry, now: SystemTime, threshold: Duration) -> bool {
    entry
        .metadata()
        .ok()
        .and_then(|m| m.modified().ok())
        .and_then(|modified| now.duration_since(modified).ok())
        .is_none_or(|age| age > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_only_stale_temporary_files() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("Explorer");
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("1.sz.hivetmp.3"), b"cmd.exe").unwrap();
        std::fs::write(dir.join("1.sz"), b"cmd.exe").unwrap();

        let later = SystemTime::now() + Duration::from_secs(600);
        assert_eq!(remove_stale(tmp.path(), later, STALE_AFTER), (1, 0));
        assert!(dir.join("1.sz").exists());
        assert!(dir.exists(), "empty locations must survive the purge");

        assert_eq!(remove_stale(tmp.path(), SystemTime::now(), STALE_AFTER), (0, 0));
    }
}
