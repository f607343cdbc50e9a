//! Registry of compiled CSS artifacts.
//!
//! The registry answers one question for the HTTP router: "which compiled file
//! should be served for this `.css` request?". It is filled by the build
//! orchestrator (fresh builds) or by adopting an existing build output
//! directory, and read by every CSS request afterwards.
//!
//! Lookup is intentionally loose: the first descriptor, in insertion order,
//! whose output path *contains* the requested path wins. A request for
//! `app.css` therefore matches `/project/tmp/app.css`. Two outputs sharing a
//! substring collide, and the earlier registration wins.

use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// One compiled output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactDescriptor {
    output_path: PathBuf,
    input_path: Option<PathBuf>,
}

impl ArtifactDescriptor {
    /// Descriptor for a file the CSS tool just produced from `input_path`.
    pub fn compiled(output_path: PathBuf, input_path: PathBuf) -> Self {
        Self {
            output_path,
            input_path: Some(input_path),
        }
    }

    /// Descriptor for an output found on disk from an earlier build.
    pub fn prebuilt(output_path: PathBuf) -> Self {
        Self {
            output_path,
            input_path: None,
        }
    }

    /// Path of the generated file.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Source that produced the file, if this process compiled it.
    pub fn input_path(&self) -> Option<&Path> {
        self.input_path.as_deref()
    }

    /// Base name of the generated file.
    pub fn file_name(&self) -> String {
        self.output_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    fn output_contains(&self, needle: &str) -> bool {
        self.output_path.to_string_lossy().contains(needle)
    }
}

/// Append-only, mutex-guarded list of [`ArtifactDescriptor`]s.
///
/// Cloning yields another handle to the same list. A single exclusive lock
/// covers reads and writes; it is held for one append or one scan and never
/// while a build tool runs.
#[derive(Debug, Clone, Default)]
pub struct AssetRegistry {
    entries: Arc<Mutex<Vec<ArtifactDescriptor>>>,
}

impl AssetRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a descriptor. Duplicates are kept.
    ///
    /// An empty output path is a caller bug and trips a debug assertion.
    pub fn add(&self, descriptor: ArtifactDescriptor) {
        debug_assert!(
            !descriptor.output_path.as_os_str().is_empty(),
            "registered artifacts must have an output path"
        );
        self.entries.lock().push(descriptor);
    }

    /// Swap the whole contents for `entries` under one lock.
    ///
    /// Readers see either the old list or the new one, never a mix.
    pub fn replace(&self, entries: Vec<ArtifactDescriptor>) {
        *self.entries.lock() = entries;
    }

    /// Output path of the first descriptor whose output path contains
    /// `requested`.
    pub fn resolve(&self, requested: &str) -> Option<PathBuf> {
        let entries = self.entries.lock();
        entries.iter().find_map(|entry| {
            tracing::trace!(output = %entry.output_path.display(), requested, "registry candidate");
            entry
                .output_contains(requested)
                .then(|| entry.output_path.clone())
        })
    }

    /// Number of registered descriptors, duplicates included.
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Whether nothing has been registered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    /// Copy of all descriptors in insertion order.
    pub fn snapshot(&self) -> Vec<ArtifactDescriptor> {
        self.entries.lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_resolve_first_added_wins() {
        let registry = AssetRegistry::new();
        registry.add(ArtifactDescriptor::compiled(
            PathBuf::from("/tmp/app.css"),
            PathBuf::from("/src/app.css"),
        ));
        registry.add(ArtifactDescriptor::prebuilt(PathBuf::from(
            "/tmp/vendor/app.css",
        )));

        assert_eq!(registry.resolve("app.css"), Some(PathBuf::from("/tmp/app.css")));
        assert_eq!(
            registry.resolve("vendor/app.css"),
            Some(PathBuf::from("/tmp/vendor/app.css"))
        );
    }

    #[test]
    fn test_resolve_substring_not_suffix() {
        let registry = AssetRegistry::new();
        registry.add(ArtifactDescriptor::prebuilt(PathBuf::from("tmp/theme.css")));

        // A fragment from the middle of the path still matches.
        assert_eq!(registry.resolve("mp/the"), Some(PathBuf::from("tmp/theme.css")));
        assert_eq!(registry.resolve("other.css"), None);
    }

    #[test]
    fn test_resolve_empty_registry() {
        let registry = AssetRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.resolve("style.css"), None);
    }

    #[test]
    fn test_duplicates_are_kept() {
        let registry = AssetRegistry::new();
        let first = ArtifactDescriptor::compiled(PathBuf::from("tmp/a.css"), PathBuf::from("a.css"));
        let second = ArtifactDescriptor::prebuilt(PathBuf::from("tmp/a.css"));
        registry.add(first.clone());
        registry.add(second);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.snapshot()[0], first);
        assert_eq!(registry.snapshot()[0].input_path(), Some(Path::new("a.css")));
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "output path")]
    fn test_empty_output_path_rejected() {
        AssetRegistry::new().add(ArtifactDescriptor::prebuilt(PathBuf::new()));
    }

    #[test]
    fn test_concurrent_adds_keep_every_entry() {
        let registry = AssetRegistry::new();
        let handles: Vec<_> = (0..64)
            .map(|i| {
                let registry = registry.clone();
                std::thread::spawn(move || {
                    registry.add(ArtifactDescriptor::prebuilt(PathBuf::from(format!(
                        "tmp/file-{i}.css"
                    ))));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let snapshot = registry.snapshot();
        assert_eq!(snapshot.len(), 64);
        let unique: HashSet<_> = snapshot.iter().map(|d| d.output_path().to_path_buf()).collect();
        assert_eq!(unique.len(), 64);
    }

    #[test]
    fn test_replace_drops_previous_entries() {
        let registry = AssetRegistry::new();
        let handle = registry.clone();
        registry.add(ArtifactDescriptor::prebuilt(PathBuf::from("/tmp/old.css")));
        registry.add(ArtifactDescriptor::prebuilt(PathBuf::from("/tmp/app.css")));

        handle.replace(vec![ArtifactDescriptor::prebuilt(PathBuf::from("/tmp/app.css"))]);

        assert_eq!(registry.len(), 1);
        assert!(registry.resolve("/old.css").is_none());
        assert_eq!(registry.resolve("/app.css"), Some(PathBuf::from("/tmp/app.css")));
    }

    #[test]
    fn test_file_name() {
        let descriptor = ArtifactDescriptor::prebuilt(PathBuf::from("tmp/css/site.css"));
        assert_eq!(descriptor.file_name(), "site.css");
    }
}
