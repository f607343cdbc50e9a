//! Single-file CSS compilation through an external tool.

use crate::error::BuildError;
use crate::registry::ArtifactDescriptor;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// A tool command line such as `npx tailwindcss` or `./tailwindcss`.
///
/// The first whitespace-separated token is the executable. Any remaining
/// tokens are passed before the per-file arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    program: String,
    args: Vec<String>,
}

impl ToolInvocation {
    /// Parse a command string. Returns `None` for a blank string.
    pub fn parse(command: &str) -> Option<Self> {
        let mut tokens = command.split_whitespace().map(str::to_string);
        let program = tokens.next()?;
        Some(Self {
            program,
            args: tokens.collect(),
        })
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// A failed compilation of one input file.
#[derive(Debug)]
pub struct BuildFailure {
    pub input: PathBuf,
    pub error: BuildError,
}

impl BuildFailure {
    pub fn new(input: impl Into<PathBuf>, error: BuildError) -> Self {
        Self {
            input: input.into(),
            error,
        }
    }

    /// Combined stdout and stderr of the tool, if it ran.
    pub fn output(&self) -> Option<&str> {
        self.error.output()
    }
}

impl fmt::Display for BuildFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.input.display(), self.error)
    }
}

/// Runs the CSS tool for one input at a time.
///
/// Each call writes `out_dir/<input file name>`; the tool itself creates the
/// file. Calls are independent and safe to run concurrently.
#[derive(Debug, Clone)]
pub struct CssCompiler {
    tool: ToolInvocation,
    out_dir: PathBuf,
    cwd: PathBuf,
}

impl CssCompiler {
    pub fn new(tool: ToolInvocation, out_dir: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            tool,
            out_dir: out_dir.into(),
            cwd: cwd.into(),
        }
    }

    pub fn tool(&self) -> &ToolInvocation {
        &self.tool
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Output location for `input`.
    pub fn output_for(&self, input: &Path) -> Result<PathBuf, BuildError> {
        let name = input
            .file_name()
            .ok_or_else(|| BuildError::NoFileName(input.to_path_buf()))?;
        Ok(self.out_dir.join(name))
    }

    /// Compile `input` with `<tool> [args] -i <input> -o <output>`.
    ///
    /// No retry. On failure the tool's combined output travels with the
    /// error.
    pub async fn compile_one(&self, input: &Path) -> Result<ArtifactDescriptor, BuildFailure> {
        let output_path = self
            .output_for(input)
            .map_err(|e| BuildFailure::new(input, e))?;

        tracing::debug!(
            tool = %self.tool,
            input = %input.display(),
            output = %output_path.display(),
            "compiling css"
        );

        let output = self
            .tool
            .command()
            .arg("-i")
            .arg(input)
            .arg("-o")
            .arg(&output_path)
            .current_dir(&self.cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|source| {
                BuildFailure::new(
                    input,
                    BuildError::Spawn {
                        tool: self.tool.program().to_string(),
                        source,
                    },
                )
            })?;

        let combined = combined_output(&output.stdout, &output.stderr);
        if !output.status.success() {
            return Err(BuildFailure::new(
                input,
                BuildError::ToolFailed {
                    tool: self.tool.to_string(),
                    status: output.status,
                    output: combined,
                },
            ));
        }

        if !combined.trim().is_empty() {
            tracing::debug!(input = %input.display(), "{}", combined.trim_end());
        }

        Ok(ArtifactDescriptor::compiled(output_path, input.to_path_buf()))
    }
}

/// Stdout followed by stderr, lossily decoded.
pub(crate) fn combined_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut text = String::from_utf8_lossy(stdout).into_owned();
    if !text.is_empty() && !stderr.is_empty() && !text.ends_with('\n') {
        text.push('\n');
    }
    text.push_str(&String::from_utf8_lossy(stderr));
    text
}
