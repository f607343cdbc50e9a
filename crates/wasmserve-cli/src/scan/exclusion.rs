use std::path::Path;

/// Directory names the scanner never descends into.
///
/// Membership is exact equality against a single path segment. `node_modules`
/// excludes `web/node_modules` but not `node_modules_old`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: Vec<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            names: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Whether `name` is an excluded directory name.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Copy of this set without the base name of `root`.
    ///
    /// Scanning `tmp/` while `tmp` is excluded would otherwise return nothing.
    pub fn without_root(&self, root: &Path) -> Self {
        let Some(base) = root.file_name().map(|n| n.to_string_lossy()) else {
            return self.clone();
        };
        Self {
            names: self
                .names
                .iter()
                .filter(|n| n.as_str() != base)
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }
}
