//! Category description file loader
//!
//! One `category: description` mapping per line. The category key is the
//! short name of a category file (its base name, not the relative path).

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::errors::{ReportError, ReportResult};

pub type CategoryDescriptions = BTreeMap<String, String>;

/// Load descriptions, failing with the 1-based line number on any line
/// without a colon.
pub fn load(path: &Path) -> ReportResult<CategoryDescriptions> {
    let content = fs::read_to_string(path).map_err(|e| ReportError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut descriptions = CategoryDescriptions::new();
    for (i, line) in content.lines().enumerate() {
        let Some((category, description)) = line.split_once(':') else {
            return Err(ReportError::MalformedDescription {
                path: path.to_path_buf(),
                line: i + 1,
            });
        };
        descriptions.insert(category.trim().to_string(), description.trim().to_string());
    }
    Ok(descriptions)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::*;

    #[test]
    fn given_valid_file_when_loading_then_maps_trimmed_pairs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catdescs");
        fs::write(&path, "gcc-fail: compiler aborted\ntimeout:  build timed out\n").unwrap();

        let descs = load(&path).unwrap();
        assert_eq!(descs["gcc-fail"], "compiler aborted");
        assert_eq!(descs["timeout"], "build timed out");
    }

    #[test]
    fn given_line_without_colon_when_loading_then_fatal_with_line_number() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("catdescs");
        fs::write(&path, "gcc-fail: compiler aborted\n\ntimeout: slow\n").unwrap();

        let err = load(&path).unwrap_err();
        match err {
            ReportError::MalformedDescription { line, .. } => assert_eq!(line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn given_missing_file_when_loading_then_errors() {
        let dir = tempdir().unwrap();
        assert!(load(&dir.path().join("absent")).is_err());
    }
}
