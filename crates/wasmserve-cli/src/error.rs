//! Error types for the wasmserve CLI.
//!
//! Errors are split the same way the tool is split:
//! - **`CliError`** is what commands return and what `main` reports
//! - **`ConfigError`** covers loading and validating `wasmserve.toml`
//! - **`BuildError`** covers the external compiler and CSS tool processes
//!
//! Domain errors convert into `CliError` through `#[from]`, so command code can
//! use `?` throughout.
//!
//! # Example
//!
//! ```rust,no_run
//! use wasmserve_cli::error::{Result, ResultExt};
//! use std::path::Path;
//!
//! fn read_template(path: &Path) -> Result<String> {
//!     std::fs::read_to_string(path).with_path(path)
//! }
//! ```

mod report;

pub use report::cli_error_to_miette;

use std::path::PathBuf;
use std::process::ExitStatus;
use thiserror::Error;

/// Top-level CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Build process errors
    #[error("Build error: {0}")]
    Build(#[from] BuildError),

    /// Invalid command-line arguments or options
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// File or directory not found
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// I/O errors from file system operations
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP server errors
    #[error("Server error: {0}")]
    Server(String),

    /// File watching errors
    #[error("File watcher error: {0}")]
    Watch(#[from] notify::Error),

    /// Interactive prompt errors
    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    /// HTTP download errors
    #[error("Download error: {0}")]
    Download(#[from] reqwest::Error),

    /// Generic errors with custom messages
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file doesn't exist at the given location
    #[error("Config file not found: {}\n\nHint: Run 'wasmserve init' or pass --config <path>", .0.display())]
    NotFound(PathBuf),

    /// Config file could not be parsed or merged
    #[error("Invalid configuration: {0}\n\nHint: Check wasmserve.toml syntax and field types")]
    Parse(String),

    /// Missing required configuration field
    #[error("Missing required field: {field}\n\nHint: {hint}")]
    MissingField {
        /// Name of the missing field
        field: String,
        /// Helpful hint for providing the field
        hint: String,
    },

    /// Invalid value for a configuration option
    #[error("Invalid value for '{field}': {value}\n\nHint: {hint}")]
    InvalidValue {
        /// Name of the field with invalid value
        field: String,
        /// The invalid value
        value: String,
        /// Helpful hint for correct values
        hint: String,
    },

    /// Serializing a generated config file failed
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// I/O error while reading or writing config
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors from the external build tools.
#[derive(Debug, Error)]
pub enum BuildError {
    /// The tool process could not be started at all
    #[error("Failed to run '{tool}': {source}\n\nHint: Check that '{tool}' is installed and on your PATH")]
    Spawn {
        /// Executable that failed to start
        tool: String,
        /// Underlying spawn error
        #[source]
        source: std::io::Error,
    },

    /// The tool ran and exited unsuccessfully
    #[error("'{tool}' exited with {status}\n{output}")]
    ToolFailed {
        /// Executable that failed
        tool: String,
        /// Exit status reported by the OS
        status: ExitStatus,
        /// Combined stdout and stderr
        output: String,
    },

    /// The input path has no file name to derive an output from
    #[error("Cannot derive an output name from {}", .0.display())]
    NoFileName(PathBuf),

    /// A build task died before reporting a result
    #[error("Build task for {} did not complete: {reason}", .input.display())]
    TaskAborted {
        /// Input the task was compiling
        input: PathBuf,
        /// Panic or cancellation message
        reason: String,
    },
}

impl BuildError {
    /// Combined tool output, when the tool got far enough to produce any.
    pub fn output(&self) -> Option<&str> {
        match self {
            BuildError::ToolFailed { output, .. } => Some(output),
            _ => None,
        }
    }
}

/// Result type alias using `CliError` as the default error type.
pub type Result<T, E = CliError> = std::result::Result<T, E>;

/// Extension trait for adding context to `Result` types.
pub trait ResultExt<T> {
    /// Turn a not-found I/O error into [`CliError::FileNotFound`] for `path`.
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T>;

    /// Append a hint line to the error message.
    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T>;

    /// Prefix the error message.
    fn context(self, msg: impl std::fmt::Display) -> Result<T>;
}

impl<T, E: Into<CliError>> ResultExt<T> for std::result::Result<T, E> {
    fn with_path(self, path: impl AsRef<std::path::Path>) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            match err {
                CliError::Io(io_err) if io_err.kind() == std::io::ErrorKind::NotFound => {
                    CliError::FileNotFound(path.as_ref().to_path_buf())
                }
                other => other,
            }
        })
    }

    fn with_hint(self, hint: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}\n\nHint: {}", err, hint))
        })
    }

    fn context(self, msg: impl std::fmt::Display) -> Result<T> {
        self.map_err(|e| {
            let err: CliError = e.into();
            CliError::Custom(format!("{}: {}", msg, err))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_not_found() {
        let err = ConfigError::NotFound(PathBuf::from("wasmserve.toml"));
        let msg = err.to_string();
        assert!(msg.contains("Config file not found"));
        assert!(msg.contains("wasmserve.toml"));
        assert!(msg.contains("Hint:"));
    }

    #[test]
    fn test_build_error_spawn() {
        let err = BuildError::Spawn {
            tool: "tailwindcss".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to run 'tailwindcss'"));
        assert!(msg.contains("no such file"));
        assert!(err.output().is_none());
    }

    #[test]
    fn test_cli_error_from_config_error() {
        let config_err = ConfigError::NotFound(PathBuf::from("test.toml"));
        let cli_err: CliError = config_err.into();
        assert!(matches!(cli_err, CliError::Config(_)));
    }

    #[test]
    fn test_cli_error_from_build_error() {
        let build_err = BuildError::TaskAborted {
            input: PathBuf::from("app.css"),
            reason: "panicked".to_string(),
        };
        let cli_err: CliError = build_err.into();
        assert!(matches!(cli_err, CliError::Build(_)));
        assert!(cli_err.to_string().contains("app.css"));
    }

    #[test]
    fn test_result_ext_with_path() {
        let result: std::io::Result<()> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let err = result.with_path("/test/path.txt").unwrap_err();
        assert!(matches!(err, CliError::FileNotFound(_)));
    }

    #[test]
    fn test_result_ext_with_hint() {
        let result: std::result::Result<(), ConfigError> =
            Err(ConfigError::NotFound(PathBuf::from("test.toml")));

        let err = result.with_hint("Try creating the file").unwrap_err();
        assert!(err.to_string().contains("Hint: Try creating the file"));
    }

    #[test]
    fn test_result_ext_context() {
        let result: std::result::Result<(), ConfigError> =
            Err(ConfigError::Parse("bad".to_string()));

        let err = result.context("Failed to initialize").unwrap_err();
        assert!(err.to_string().starts_with("Failed to initialize"));
    }

    #[test]
    fn test_config_error_invalid_value() {
        let err = ConfigError::InvalidValue {
            field: "http".to_string(),
            value: "abc".to_string(),
            hint: "Use a port such as 8080".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("Invalid value for 'http'"));
        assert!(msg.contains("abc"));
        assert!(msg.contains("8080"));
    }
}
