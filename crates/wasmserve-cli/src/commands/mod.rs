//! Command implementations for the wasmserve CLI.
//!
//! - [`init`] - Write `wasmserve.toml`
//! - [`build`] - One-shot CSS and wasm build
//! - [`run`] - Serve an existing build
//! - [`watch`] - Build, serve, rebuild on change
//!
//! Each command provides an `execute` function that takes the parsed command
//! arguments and returns a Result.

pub mod build;
pub mod init;
pub mod run;
pub mod watch;

pub use build::execute as build_execute;
pub use init::execute as init_execute;
pub use run::execute as run_execute;
pub use watch::execute as watch_execute;
