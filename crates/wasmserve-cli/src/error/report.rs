//! Miette diagnostic conversion for CLI errors.

use crate::error::{BuildError, CliError};
use miette::Report;

/// Convert CliError to miette Report
pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => miette::miette!("Configuration error: {}", e),
        _ => miette::miette!("{}", err),
    }
}

/// Convert BuildError to miette Report
pub fn build_error_to_miette(err: BuildError) -> Report {
    match err {
        BuildError::ToolFailed {
            tool,
            status,
            output,
        } => {
            let output = output.trim();
            if output.is_empty() {
                miette::miette!("'{}' exited with {}", tool, status)
            } else {
                miette::miette!("'{}' exited with {}\n\n{}", tool, status, output)
            }
        }
        _ => miette::miette!("{}", err),
    }
}
