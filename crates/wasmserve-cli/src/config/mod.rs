//! Project configuration (`wasmserve.toml`).
//!
//! Merges settings from CLI args, environment variables, and the config file.
//! Priority: CLI > Environment > File > Defaults
//!
//! Unknown keys are ignored, so config files that also carry settings for
//! other tools (for example an `air` watcher section) still load.

mod defaults;
mod loading;
mod validation;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub use defaults::*;
pub use loading::ConfigOverrides;
pub use validation::{compile_exclude_regex, parse_listen_addr};

/// Top-level `wasmserve.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    /// Compile `.css` sources with the CSS tool and serve them from the registry
    pub enable_tailwind: bool,

    /// CSS tool command, e.g. `npx tailwindcss` or `./tailwindcss`
    pub tailwind_exec: String,

    /// File name of the compiled wasm module, as requested by the browser
    pub wasm_file: String,

    /// Listen address: `8080`, `:8080` or `127.0.0.1:8080`
    pub http: String,

    /// Value for `go build -tags`
    pub tags: String,

    /// Access-Control-Allow-Origin value, `*` for any origin
    pub allow_origin: String,

    /// Value for `go build -overlay`
    pub overlay: String,

    /// Package handed to `go build`
    pub package: String,

    /// Go toolchain executable
    pub compiler: String,

    /// Explicit `wasm_exec.js`; empty means ask the toolchain for GOROOT
    pub wasm_exec: String,

    /// Project root
    pub root: PathBuf,

    /// Build output directory, relative to `root`
    pub tmp_dir: PathBuf,

    pub build: BuildConfig,

    pub misc: MiscConfig,
}

/// `[build]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory names skipped by the CSS scan and the watcher
    pub exclude_dir: Vec<String>,

    /// Extensions that trigger a rebuild in watch mode
    pub include_ext: Vec<String>,

    /// File names ignored by the watcher
    pub exclude_file: Vec<String>,

    /// Regexes matched against changed paths; a match is ignored
    pub exclude_regex: Vec<String>,

    /// Watcher debounce in milliseconds
    pub delay: u64,

    /// Maximum concurrent CSS tool processes; 0 is unbounded
    pub concurrency: usize,
}

/// `[misc]` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiscConfig {
    /// Remove `tmp_dir` when watch mode exits
    pub clean_on_exit: bool,
}

impl ProjectConfig {
    /// Location of the compiled wasm module.
    pub fn wasm_path(&self) -> PathBuf {
        self.tmp_dir.join(&self.wasm_file)
    }

    /// Explicit `wasm_exec.js` override, if configured.
    pub fn wasm_exec_override(&self) -> Option<PathBuf> {
        let trimmed = self.wasm_exec.trim();
        (!trimmed.is_empty()).then(|| {
            let path = PathBuf::from(trimmed);
            if path.is_absolute() {
                path
            } else {
                self.root.join(path)
            }
        })
    }

    /// `allow_origin`, if set.
    pub fn allow_origin(&self) -> Option<&str> {
        let trimmed = self.allow_origin.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    /// Content for a freshly generated `wasmserve.toml`.
    pub fn to_toml(&self) -> crate::error::Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| crate::error::ConfigError::Serialize(e).into())
    }
}
