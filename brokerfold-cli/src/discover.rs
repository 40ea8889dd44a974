use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// `{base}/{YYYY}-{MM}`
pub fn month_dir(base: &Path, year: i32, month: u32) -> PathBuf {
    base.join(format!("{year:04}-{month:02}"))
}

/// Statement files in a month directory, sorted by file name. Hidden files and
/// earlier combined exports are skipped.
pub fn list_statements(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("read {}", dir.display()))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("read {}", dir.display()))?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') || name.contains("Combined") {
            continue;
        }
        if entry.file_type()?.is_file() {
            files.push(entry.path());
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_dir_is_zero_padded() {
        assert_eq!(
            month_dir(Path::new("../statements/ADMIS"), 2016, 5),
            PathBuf::from("../statements/ADMIS/2016-05")
        );
    }

    #[test]
    fn test_lists_statements_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        for name in [
            "262-V8960:2016-05-31.txt",
            "262-V8956:2016-05-31.txt",
            ".DS_Store",
            "2016-05_Combined.xlsx",
        ] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("old")).unwrap();

        let names: Vec<_> = list_statements(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["262-V8956:2016-05-31.txt", "262-V8960:2016-05-31.txt"]);
    }

    #[test]
    fn test_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = list_statements(&dir.path().join("2016-05")).unwrap_err();
        assert!(err.to_string().contains("2016-05"));
    }
}
