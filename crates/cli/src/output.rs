// Output path selection: never overwrite an earlier report

use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// `path` itself when free; otherwise `<stem>_<YYYYMMDD-HHMMSS>.<ext>`, then
/// `<stem>_<YYYYMMDD-HHMMSS>-<n>.<ext>` until an unused name is found.
pub fn unique_output_path(path: &Path, now: NaiveDateTime) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = path.extension().map(|e| e.to_string_lossy().into_owned());
    let stamp = now.format("%Y%m%d-%H%M%S").to_string();

    let named = |suffix: String| {
        let file = match &ext {
            Some(ext) => format!("{stem}_{stamp}{suffix}.{ext}"),
            None => format!("{stem}_{stamp}{suffix}"),
        };
        path.with_file_name(file)
    };

    let candidate = named(String::new());
    if !candidate.exists() {
        return candidate;
    }
    (1..)
        .map(|n| named(format!("-{n}")))
        .find(|p| !p.exists())
        .unwrap_or(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(12, 30, 5)
            .unwrap()
    }

    #[test]
    fn free_path_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.xlsx");
        assert_eq!(unique_output_path(&path, noon()), path);
    }

    #[test]
    fn existing_path_gets_timestamp() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.xlsx");
        std::fs::write(&path, b"old").unwrap();
        assert_eq!(
            unique_output_path(&path, noon()),
            dir.path().join("results_20240501-123005.xlsx")
        );
    }

    #[test]
    fn counter_after_timestamp_collision() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results.xlsx");
        std::fs::write(&path, b"old").unwrap();
        std::fs::write(dir.path().join("results_20240501-123005.xlsx"), b"old").unwrap();
        std::fs::write(dir.path().join("results_20240501-123005-1.xlsx"), b"old").unwrap();
        assert_eq!(
            unique_output_path(&path, noon()),
            dir.path().join("results_20240501-123005-2.xlsx")
        );
    }

    #[test]
    fn no_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results");
        std::fs::write(&path, b"old").unwrap();
        assert_eq!(
            unique_output_path(&path, noon()),
            dir.path().join("results_20240501-123005")
        );
    }
}
