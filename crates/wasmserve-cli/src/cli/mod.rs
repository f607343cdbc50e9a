//! Command-line interface definition for wasmserve.
//!
//! # Command Structure
//!
//! - `wasmserve init` - Write `wasmserve.toml` interactively
//! - `wasmserve build` - Compile CSS and the wasm module once
//! - `wasmserve run` - Serve an existing build
//! - `wasmserve watch` - Build, serve, and rebuild on change

mod commands;
mod validation;

use clap::Parser;

pub use commands::{BuildArgs, Command, InitArgs, RunArgs, WatchArgs};
pub use validation::{parse_http, parse_origin};

/// wasmserve - development server for Go WebAssembly programs
#[derive(Parser, Debug)]
#[command(
    name = "wasmserve",
    version,
    about = "Build and serve Go WebAssembly programs",
    long_about = "wasmserve compiles a Go program for GOOS=js GOARCH=wasm, optionally compiles\n\
                  CSS with the Tailwind CLI, and serves everything with a generated index.html\n\
                  and the toolchain's wasm_exec.js."
)]
pub struct Cli {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}
