use crate::config::{BuildConfig, MiscConfig, ProjectConfig};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_FILE: &str = "wasmserve.toml";
pub const DEFAULT_HTTP: &str = "8080";
pub const DEFAULT_WASM_FILE: &str = "main.wasm";
pub const DEFAULT_TMP_DIR: &str = "tmp";
pub const DEFAULT_ROOT: &str = ".";
pub const DEFAULT_TAILWIND_EXEC: &str = "npx tailwindcss";
pub const DEFAULT_COMPILER: &str = "go";
pub const DEFAULT_PACKAGE: &str = ".";

pub fn default_exclude_dir() -> Vec<String> {
    ["assets", "tmp", "vendor", "frontend/node_modules"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub fn default_include_ext() -> Vec<String> {
    ["go", "tpl", "tmpl", "html", "css"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub fn default_exclude_regex() -> Vec<String> {
    vec!["_test.go".to_string()]
}

pub fn default_delay() -> u64 {
    1000
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            enable_tailwind: false,
            tailwind_exec: DEFAULT_TAILWIND_EXEC.to_string(),
            wasm_file: DEFAULT_WASM_FILE.to_string(),
            http: DEFAULT_HTTP.to_string(),
            tags: String::new(),
            allow_origin: String::new(),
            overlay: String::new(),
            package: DEFAULT_PACKAGE.to_string(),
            compiler: DEFAULT_COMPILER.to_string(),
            wasm_exec: String::new(),
            root: PathBuf::from(DEFAULT_ROOT),
            tmp_dir: PathBuf::from(DEFAULT_TMP_DIR),
            build: BuildConfig::default(),
            misc: MiscConfig::default(),
        }
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            exclude_dir: default_exclude_dir(),
            include_ext: default_include_ext(),
            exclude_file: Vec::new(),
            exclude_regex: default_exclude_regex(),
            delay: default_delay(),
            concurrency: 0,
        }
    }
}
