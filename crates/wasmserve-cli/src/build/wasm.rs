//! Compiling the Go program to WebAssembly.

use super::executor::combined_output;
use crate::config::ProjectConfig;
use crate::error::BuildError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;

/// One `go build` invocation targeting `js/wasm`.
#[derive(Debug, Clone)]
pub struct WasmBuild {
    compiler: String,
    root: PathBuf,
    output: PathBuf,
    tags: String,
    overlay: String,
    package: String,
}

impl WasmBuild {
    pub fn from_config(config: &ProjectConfig) -> Self {
        Self {
            compiler: config.compiler.clone(),
            root: config.root.clone(),
            output: config.wasm_path(),
            tags: config.tags.clone(),
            overlay: config.overlay.clone(),
            package: config.package.clone(),
        }
    }

    /// Where the compiled binary is written.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Arguments after the compiler executable.
    pub fn args(&self) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec!["build".into(), "-o".into(), self.output.clone().into()];
        if !self.tags.is_empty() {
            args.push("-tags".into());
            args.push(self.tags.clone().into());
        }
        if !self.overlay.is_empty() {
            args.push("-overlay".into());
            args.push(self.overlay.clone().into());
        }
        let package = if self.package.is_empty() { "." } else { self.package.as_str() };
        args.push(package.into());
        args
    }

    /// Run the compiler. Returns its combined output on success.
    pub async fn run(&self) -> Result<String, BuildError> {
        let args = self.args();
        tracing::debug!(
            compiler = %self.compiler,
            args = ?args,
            dir = %self.root.display(),
            "compiling wasm"
        );

        let mut cmd = Command::new(&self.compiler);
        cmd.args(&args)
            .envs(target_env(std::env::var_os("GO111MODULE").is_some()))
            .current_dir(&self.root)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let output = cmd.output().await.map_err(|source| BuildError::Spawn {
            tool: self.compiler.clone(),
            source,
        })?;

        let combined = combined_output(&output.stdout, &output.stderr);
        if !output.status.success() {
            return Err(BuildError::ToolFailed {
                tool: format!("{} build", self.compiler),
                status: output.status,
                output: combined,
            });
        }

        if !combined.trim().is_empty() {
            tracing::info!("{}", combined.trim_end());
        }
        Ok(combined)
    }
}

/// Variables added to the inherited environment for a wasm build.
///
/// Module mode is only forced when the caller has not chosen one.
pub fn target_env(go111module_set: bool) -> Vec<(&'static str, &'static str)> {
    let mut env = vec![("GOOS", "js"), ("GOARCH", "wasm")];
    if !go111module_set {
        env.push(("GO111MODULE", "on"));
    }
    env
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(tags: &str, overlay: &str, package: &str) -> WasmBuild {
        WasmBuild {
            compiler: "go".to_string(),
            root: PathBuf::from("/project"),
            output: PathBuf::from("/project/tmp/main.wasm"),
            tags: tags.to_string(),
            overlay: overlay.to_string(),
            package: package.to_string(),
        }
    }

    fn strings(args: Vec<OsString>) -> Vec<String> {
        args.into_iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_args_minimal() {
        assert_eq!(
            strings(build("", "", ".").args()),
            ["build", "-o", "/project/tmp/main.wasm", "."]
        );
    }

    #[test]
    fn test_args_with_tags_overlay_and_package() {
        assert_eq!(
            strings(build("dev,debug", "overlay.json", "./cmd/app").args()),
            [
                "build",
                "-o",
                "/project/tmp/main.wasm",
                "-tags",
                "dev,debug",
                "-overlay",
                "overlay.json",
                "./cmd/app"
            ]
        );
    }

    #[test]
    fn test_args_empty_package_defaults_to_current() {
        assert_eq!(strings(build("", "", "").args()).last().unwrap(), ".");
    }

    #[test]
    fn test_target_env() {
        assert_eq!(
            target_env(false),
            [("GOOS", "js"), ("GOARCH", "wasm"), ("GO111MODULE", "on")]
        );
        assert_eq!(target_env(true), [("GOOS", "js"), ("GOARCH", "wasm")]);
    }

    #[tokio::test]
    async fn test_run_missing_compiler() {
        let mut wasm = build("", "", ".");
        wasm.compiler = "wasmserve-no-such-go-x9".to_string();
        wasm.root = std::env::temp_dir();

        let err = wasm.run().await.unwrap_err();
        assert!(matches!(err, BuildError::Spawn { .. }));
    }
}
