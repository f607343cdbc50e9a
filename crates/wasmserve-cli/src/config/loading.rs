use crate::config::{ProjectConfig, DEFAULT_CONFIG_FILE};
use crate::error::{ConfigError, Result};
use figment::{
    providers::{Env, Format as _, Serialized, Toml},
    Figment,
};
use serde::Serialize;
use std::path::{Component, Path, PathBuf};

/// Values given on the command line. Unset fields leave the merged value alone.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub http: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allow_origin: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overlay: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
}

impl ProjectConfig {
    /// Load, resolve and validate configuration relative to the process
    /// working directory.
    pub fn load(config_path: Option<&Path>, overrides: &ConfigOverrides) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        Self::load_from(&cwd, config_path, overrides)
    }

    /// Load configuration as if the process ran in `cwd`.
    ///
    /// Without `config_path`, `wasmserve.toml` in `cwd` is used when present
    /// and defaults apply otherwise. An explicit `config_path` must exist.
    pub fn load_from(
        cwd: &Path,
        config_path: Option<&Path>,
        overrides: &ConfigOverrides,
    ) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = match config_path {
            Some(path) => {
                let path = cwd.join(path);
                if !path.is_file() {
                    return Err(ConfigError::NotFound(path).into());
                }
                Some(path)
            }
            None => {
                let default_path = cwd.join(DEFAULT_CONFIG_FILE);
                default_path.is_file().then_some(default_path)
            }
        };

        if let Some(path) = &config_file {
            tracing::debug!(path = %path.display(), "loading config file");
            figment = figment.merge(Toml::file(path));
        }

        // WASMSERVE_HTTP, WASMSERVE_BUILD__DELAY, ...
        figment = figment.merge(Env::prefixed("WASMSERVE_").split("__"));

        figment = figment.merge(Serialized::defaults(overrides));

        let mut config: Self = figment
            .extract()
            .map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.resolve_paths(cwd);
        config.validate()?;
        Ok(config)
    }

    /// Make `root` absolute against `cwd` and `tmp_dir` absolute against
    /// `root`.
    pub fn resolve_paths(&mut self, cwd: &Path) {
        self.root = normalize(&cwd.join(&self.root));
        self.tmp_dir = normalize(&self.root.join(&self.tmp_dir));
    }
}

/// Lexically drop `.` and fold `..` without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

#[cfg(test)]
mod normalize_tests {
    use super::normalize;
    use std::path::{Path, PathBuf};

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/./b/../c")), PathBuf::from("/a/c"));
        assert_eq!(normalize(Path::new("/a/b/.")), PathBuf::from("/a/b"));
    }
}
