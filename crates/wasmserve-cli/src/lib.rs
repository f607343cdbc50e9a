//! wasmserve - development server for Go WebAssembly programs.
//!
//! Compiles a Go package for `GOOS=js GOARCH=wasm`, optionally compiles every
//! `.css` source with the Tailwind CLI, and serves the result together with a
//! generated bootstrap page and the toolchain's `wasm_exec.js`.
//!
//! # Architecture
//!
//! - [`registry`] - Concurrency-safe index of compiled CSS files
//! - [`scan`] - Recursive source discovery with excluded directories
//! - [`build`] - CSS fan-out/fan-in and the wasm compiler invocation
//! - [`server`] - Request routing and the axum server
//! - [`watch`] - File watching for rebuilds
//! - [`config`] - `wasmserve.toml` loading
//! - [`commands`] - `init`, `build`, `run` and `watch`
//! - [`error`], [`logger`], [`ui`] - Errors, tracing setup, terminal output
//!
//! # Example
//!
//! ```rust,no_run
//! use wasmserve_cli::{registry::AssetRegistry, scan::{scan, ExclusionSet}};
//! use std::path::Path;
//!
//! let sources = scan(Path::new("."), &ExclusionSet::new(["tmp", "vendor"]), ".css");
//! let registry = AssetRegistry::new();
//! assert!(registry.is_empty() || !sources.is_empty());
//! ```

pub mod assets;
pub mod build;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logger;
pub mod registry;
pub mod scan;
pub mod server;
pub mod ui;
pub mod watch;

pub use error::{BuildError, CliError, ConfigError, Result, ResultExt};
