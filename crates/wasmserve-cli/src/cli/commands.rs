use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::cli::validation::{parse_http, parse_origin};
use crate::config::ConfigOverrides;

/// Available wasmserve subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create wasmserve.toml in the current directory
    ///
    /// Asks whether to compile CSS with Tailwind and which Tailwind
    /// executable to use, then writes the config file and optionally a
    /// default tailwind.config.js.
    Init(InitArgs),

    /// Build the wasm module and all CSS files once
    ///
    /// CSS files are compiled concurrently with the wasm module. Outputs
    /// land in tmp_dir.
    Build(BuildArgs),

    /// Serve the current build
    ///
    /// CSS files already present in tmp_dir are served as-is; nothing is
    /// rebuilt.
    Run(RunArgs),

    /// Build, serve, and rebuild when sources change
    ///
    /// Press Ctrl+C to stop. A second Ctrl+C exits immediately.
    Watch(WatchArgs),
}

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing wasmserve.toml
    #[arg(short, long)]
    pub force: bool,

    /// Accept all defaults without prompting
    #[arg(short = 'y', long)]
    pub yes: bool,
}

/// Arguments for the build command
#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Config file [default: wasmserve.toml]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Go build tags
    #[arg(short, long)]
    pub tags: Option<String>,

    /// JSON file overriding source files (see `go help build`)
    #[arg(short, long, value_name = "FILE")]
    pub overlay: Option<String>,

    /// Package to build [default: .]
    #[arg(value_name = "PACKAGE")]
    pub package: Option<String>,
}

/// Arguments for the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Config file [default: wasmserve.toml]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// HTTP bind address: 8080, :8080 or host:port
    #[arg(short = 'p', long, value_parser = parse_http)]
    pub http: Option<String>,

    /// Allow this origin (or * for all origins) to make requests
    #[arg(short, long, value_parser = parse_origin)]
    pub allow_origin: Option<String>,

    /// Arguments passed to the program as go.argv
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

/// Arguments for the watch command
#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Config file [default: wasmserve.toml]
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// HTTP bind address: 8080, :8080 or host:port
    #[arg(short = 'p', long, value_parser = parse_http)]
    pub http: Option<String>,

    /// Allow this origin (or * for all origins) to make requests
    #[arg(short, long, value_parser = parse_origin)]
    pub allow_origin: Option<String>,

    /// Go build tags
    #[arg(short, long)]
    pub tags: Option<String>,

    /// Arguments passed to the program as go.argv
    #[arg(last = true, value_name = "ARGS")]
    pub args: Vec<String>,
}

impl BuildArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            tags: self.tags.clone(),
            overlay: self.overlay.clone(),
            package: self.package.clone(),
            ..Default::default()
        }
    }
}

impl RunArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            http: self.http.clone(),
            allow_origin: self.allow_origin.clone(),
            ..Default::default()
        }
    }
}

impl WatchArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            http: self.http.clone(),
            allow_origin: self.allow_origin.clone(),
            tags: self.tags.clone(),
            ..Default::default()
        }
    }
}
