//! File system watcher for `wasmserve watch`.
//!
//! Watches the project root recursively and forwards changes to files that
//! can affect the build: sources with an included extension, outside
//! excluded directories and outside the build output directory.

use crate::config::{compile_exclude_regex, ProjectConfig};
use crate::error::{CliError, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// File change event type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileChange {
    /// File was modified
    Modified(PathBuf),
    /// File was created
    Created(PathBuf),
    /// File was removed
    Removed(PathBuf),
}

impl FileChange {
    /// Get the path affected by this change.
    pub fn path(&self) -> &Path {
        match self {
            FileChange::Modified(p) | FileChange::Created(p) | FileChange::Removed(p) => p,
        }
    }
}

/// Decides which paths are worth a rebuild.
#[derive(Debug, Clone)]
pub struct WatchFilter {
    root: PathBuf,
    tmp_dir: PathBuf,
    include_ext: Vec<String>,
    exclude_dir: Vec<String>,
    exclude_file: Vec<String>,
    exclude_regex: Vec<Regex>,
}

impl WatchFilter {
    /// Filter for a resolved `config`.
    pub fn from_config(config: &ProjectConfig) -> Result<Self> {
        Ok(Self {
            root: config.root.clone(),
            tmp_dir: config.tmp_dir.clone(),
            include_ext: config.build.include_ext.clone(),
            exclude_dir: config.build.exclude_dir.clone(),
            exclude_file: config.build.exclude_file.clone(),
            exclude_regex: compile_exclude_regex(&config.build.exclude_regex)?,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Whether a change to `path` should trigger a rebuild.
    pub fn is_relevant(&self, path: &Path) -> bool {
        let Ok(rel) = path.strip_prefix(&self.root) else {
            return false;
        };
        if path.starts_with(&self.tmp_dir) {
            return false;
        }

        let dirs: Vec<&str> = rel
            .parent()
            .into_iter()
            .flat_map(|p| p.components())
            .filter_map(|c| c.as_os_str().to_str())
            .collect();

        // Hidden files and directories (.git, .DS_Store, editor swap files)
        let hidden = rel
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .any(|name| name.starts_with('.') && name != "." && name != "..");
        if hidden {
            return false;
        }

        for excluded in &self.exclude_dir {
            if excluded.contains('/') {
                if rel.starts_with(excluded) {
                    return false;
                }
            } else if dirs.iter().any(|d| d == excluded) {
                return false;
            }
        }

        let file_name = rel.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        let rel_str = rel.to_string_lossy().replace('\\', "/");
        if self
            .exclude_file
            .iter()
            .any(|f| f == file_name || *f == rel_str)
        {
            return false;
        }

        if self.exclude_regex.iter().any(|re| re.is_match(&rel_str)) {
            return false;
        }

        let ext = rel.extension().and_then(|e| e.to_str()).unwrap_or_default();
        self.include_ext.iter().any(|e| e == ext)
    }
}

/// File watcher with debouncing and filtering.
///
/// Watches a directory recursively and sends change events through a channel.
/// A change to the same path within the debounce window is dropped.
pub struct FileWatcher {
    _watcher: RecommendedWatcher,
    root: PathBuf,
}

impl FileWatcher {
    /// Start watching `filter.root()`.
    ///
    /// # Errors
    ///
    /// Returns error if the root doesn't exist or the OS watcher cannot start.
    pub fn new(filter: WatchFilter, debounce_ms: u64) -> Result<(Self, mpsc::Receiver<FileChange>)> {
        let root = filter.root().to_path_buf();
        if !root.exists() {
            return Err(CliError::FileNotFound(root));
        }

        let (tx, rx) = mpsc::channel(100);
        let debounce = Duration::from_millis(debounce_ms);
        let mut last_event: Option<(PathBuf, Instant)> = None;

        let mut watcher = notify::recommended_watcher(move |res: notify::Result<Event>| {
            let event = match res {
                Ok(event) => event,
                Err(err) => {
                    tracing::warn!("watch error: {}", err);
                    return;
                }
            };

            for path in &event.paths {
                if !filter.is_relevant(path) {
                    continue;
                }

                let now = Instant::now();
                if let Some((last_path, last_time)) = &last_event {
                    if last_path == path && now.duration_since(*last_time) < debounce {
                        continue;
                    }
                }
                last_event = Some((path.clone(), now));

                let change = match event.kind {
                    notify::EventKind::Create(_) => FileChange::Created(path.clone()),
                    notify::EventKind::Modify(_) => FileChange::Modified(path.clone()),
                    notify::EventKind::Remove(_) => FileChange::Removed(path.clone()),
                    _ => continue,
                };

                // Receiver gone means watch mode is shutting down.
                let _ = tx.blocking_send(change);
            }
        })?;

        watcher.watch(&root, RecursiveMode::Recursive)?;

        Ok((
            Self {
                _watcher: watcher,
                root,
            },
            rx,
        ))
    }

    /// Get the root directory being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter() -> WatchFilter {
        let mut config = ProjectConfig::default();
        config.build.exclude_file = vec!["generated.go".to_string()];
        config.resolve_paths(Path::new("/project"));
        WatchFilter::from_config(&config).unwrap()
    }

    #[test]
    fn test_included_extensions() {
        let f = filter();
        assert!(f.is_relevant(Path::new("/project/main.go")));
        assert!(f.is_relevant(Path::new("/project/web/index.html")));
        assert!(f.is_relevant(Path::new("/project/styles/app.css")));
        assert!(!f.is_relevant(Path::new("/project/README.md")));
        assert!(!f.is_relevant(Path::new("/project/Makefile")));
    }

    #[test]
    fn test_excluded_dirs_and_tmp() {
        let f = filter();
        assert!(!f.is_relevant(Path::new("/project/tmp/app.css")));
        assert!(!f.is_relevant(Path::new("/project/vendor/pkg/x.go")));
        assert!(!f.is_relevant(Path::new("/project/web/assets/a.css")));
        assert!(!f.is_relevant(Path::new("/project/frontend/node_modules/lib/x.css")));
        // Exact segment match only.
        assert!(f.is_relevant(Path::new("/project/vendored/x.go")));
    }

    #[test]
    fn test_excluded_files_and_regex() {
        let f = filter();
        assert!(!f.is_relevant(Path::new("/project/pkg/generated.go")));
        assert!(!f.is_relevant(Path::new("/project/main_test.go")));
        assert!(f.is_relevant(Path::new("/project/testing.go")));
    }

    #[test]
    fn test_hidden_and_outside_root() {
        let f = filter();
        assert!(!f.is_relevant(Path::new("/project/.git/config.go")));
        assert!(!f.is_relevant(Path::new("/project/.main.go.swp")));
        assert!(!f.is_relevant(Path::new("/other/main.go")));
    }

    #[test]
    fn test_file_change_path() {
        let path = PathBuf::from("/project/main.go");

        assert_eq!(FileChange::Modified(path.clone()).path(), path.as_path());
        assert_eq!(FileChange::Created(path.clone()).path(), path.as_path());
        assert_eq!(FileChange::Removed(path.clone()).path(), path.as_path());
    }

    #[test]
    fn test_missing_root() {
        let mut config = ProjectConfig::default();
        config.resolve_paths(Path::new("/definitely/not/here/wasmserve"));
        let filter = WatchFilter::from_config(&config).unwrap();
        assert!(matches!(
            FileWatcher::new(filter, 100),
            Err(CliError::FileNotFound(_))
        ));
    }
}
