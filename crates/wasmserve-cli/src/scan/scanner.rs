use super::ExclusionSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collect every regular file under `root` whose path ends with `suffix`.
///
/// Directories named in `exclusions` are skipped with their whole subtree.
/// The base name of `root` is lifted from the set first, so scanning `tmp/`
/// works even when `tmp` is excluded. Exclusion never applies to files.
///
/// Any traversal error aborts the walk. The error is logged and the result is
/// empty, so callers never build from a partial listing.
pub fn scan(root: &Path, exclusions: &ExclusionSet, suffix: &str) -> Vec<PathBuf> {
    let exclusions = exclusions.without_root(root);
    let mut found = Vec::new();
    let walker = WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| {
            // The root itself is always entered.
            if entry.depth() == 0 || !entry.file_type().is_dir() {
                return true;
            }
            let name = entry.file_name().to_string_lossy();
            !exclusions.contains(&name)
        });

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                tracing::warn!(root = %root.display(), error = %err, "source scan aborted");
                return Vec::new();
            }
        };

        if entry.file_type().is_file() && entry.path().to_string_lossy().ends_with(suffix) {
            found.push(entry.into_path());
        }
    }

    tracing::debug!(root = %root.display(), suffix, count = found.len(), "source scan finished");
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn touch(root: &Path, rel: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "/* css */").unwrap();
    }

    fn relative(root: &Path, found: Vec<PathBuf>) -> Vec<String> {
        let mut rel: Vec<String> = found
            .into_iter()
            .map(|p| {
                p.strip_prefix(root)
                    .unwrap()
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect();
        rel.sort();
        rel
    }

    #[test]
    fn test_scan_skips_excluded_subtrees() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "app.css");
        touch(root, "web/site.css");
        touch(root, "web/node_modules/lib.css");
        touch(root, "node_modules/deep/nested/x.css");
        touch(root, "tmp/out.css");
        touch(root, "web/readme.md");

        let set = ExclusionSet::new(["node_modules", "tmp"]);
        let found = relative(root, scan(root, &set, ".css"));

        assert_eq!(found, vec!["app.css", "web/site.css"]);
    }

    #[test]
    fn test_scan_root_named_like_exclusion_still_descends() {
        let dir = TempDir::new().unwrap();
        let tmp = dir.path().join("tmp");
        touch(&tmp, "a.css");
        touch(&tmp, "nested/b.css");

        let set = ExclusionSet::new(["tmp"]);
        let found = relative(&tmp, scan(&tmp, &set, ".css"));

        assert_eq!(found, vec!["a.css", "nested/b.css"]);
    }

    #[test]
    fn test_scan_root_name_is_lifted_for_nested_dirs_too() {
        let dir = TempDir::new().unwrap();
        let tmp = dir.path().join("tmp");
        touch(&tmp, "tmp/inner.css");
        touch(&tmp, "vendor/skip.css");

        let set = ExclusionSet::new(["tmp", "vendor"]);
        let found = relative(&tmp, scan(&tmp, &set, ".css"));

        assert_eq!(found, vec!["tmp/inner.css"]);
    }

    #[test]
    fn test_scan_exclusion_is_not_prefix_match() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "vendor_extra/a.css");
        touch(root, "vendor/b.css");

        let set = ExclusionSet::new(["vendor"]);
        let found = relative(root, scan(root, &set, ".css"));

        assert_eq!(found, vec!["vendor_extra/a.css"]);
    }

    #[test]
    fn test_scan_file_named_like_exclusion_is_collected() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "styles/tmp.css");
        fs::write(root.join("tmp.css"), "").unwrap();

        let set = ExclusionSet::new(["tmp.css"]);
        let found = relative(root, scan(root, &set, ".css"));

        assert_eq!(found, vec!["styles/tmp.css", "tmp.css"]);
    }

    #[test]
    fn test_scan_suffix_is_case_sensitive_and_skips_dirs() {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        touch(root, "upper.CSS");
        touch(root, "lower.css");
        fs::create_dir_all(root.join("folder.css")).unwrap();

        let found = relative(root, scan(root, &ExclusionSet::default(), ".css"));

        assert_eq!(found, vec!["lower.css"]);
    }

    #[test]
    fn test_scan_missing_root_returns_empty() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        assert!(scan(&missing, &ExclusionSet::default(), ".css").is_empty());
    }
}
