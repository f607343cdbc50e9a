//! Shared state for request handlers.

use super::runtime::RuntimeScript;
use crate::config::ProjectConfig;
use crate::registry::AssetRegistry;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything the router reads. Cheap to clone.
#[derive(Debug, Clone)]
pub struct ServerState {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    root: PathBuf,
    wasm_file: String,
    wasm_path: PathBuf,
    css_enabled: bool,
    registry: AssetRegistry,
    runtime: RuntimeScript,
    argv: Vec<String>,
}

impl ServerState {
    /// State for a resolved `config`.
    ///
    /// `argv` becomes `go.argv` in the bootstrap page.
    pub fn new(config: &ProjectConfig, registry: AssetRegistry, argv: Vec<String>) -> Self {
        let runtime = match config.wasm_exec_override() {
            Some(path) => RuntimeScript::from_path(path),
            None => RuntimeScript::from_toolchain(config.compiler.clone()),
        };

        Self {
            inner: Arc::new(Inner {
                root: config.root.clone(),
                wasm_file: config.wasm_file.clone(),
                wasm_path: config.wasm_path(),
                css_enabled: config.enable_tailwind,
                registry,
                runtime,
                argv,
            }),
        }
    }

    /// Directory static files are served from.
    pub fn root(&self) -> &Path {
        &self.inner.root
    }

    pub fn wasm_file(&self) -> &str {
        &self.inner.wasm_file
    }

    /// Build output served for the wasm module.
    pub fn wasm_path(&self) -> &Path {
        &self.inner.wasm_path
    }

    pub fn css_enabled(&self) -> bool {
        self.inner.css_enabled
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.inner.registry
    }

    pub fn runtime(&self) -> &RuntimeScript {
        &self.inner.runtime
    }

    pub fn argv(&self) -> &[String] {
        &self.inner.argv
    }
}
