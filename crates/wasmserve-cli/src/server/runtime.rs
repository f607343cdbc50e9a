//! Locating `wasm_exec.js`, the Go runtime glue script.

use std::path::{Path, PathBuf};
use tokio::process::Command;
use tokio::sync::OnceCell;

/// Locations inside GOROOT, newest layout first.
const GOROOT_CANDIDATES: [&str; 2] = ["lib/wasm/wasm_exec.js", "misc/wasm/wasm_exec.js"];

/// Resolves `wasm_exec.js` either from configuration or from the toolchain.
///
/// A toolchain lookup runs `<compiler> env GOROOT` once; later calls reuse the
/// result. Failed lookups are not cached.
#[derive(Debug)]
pub struct RuntimeScript {
    source: Source,
    resolved: OnceCell<PathBuf>,
}

#[derive(Debug)]
enum Source {
    Override(PathBuf),
    Toolchain(String),
}

impl RuntimeScript {
    /// Always serve `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            source: Source::Override(path.into()),
            resolved: OnceCell::new(),
        }
    }

    /// Ask `compiler` where its installation lives.
    pub fn from_toolchain(compiler: impl Into<String>) -> Self {
        Self {
            source: Source::Toolchain(compiler.into()),
            resolved: OnceCell::new(),
        }
    }

    /// Path of the script to serve. The error is the text sent with a 500.
    pub async fn locate(&self) -> Result<PathBuf, String> {
        match &self.source {
            Source::Override(path) => Ok(path.clone()),
            Source::Toolchain(compiler) => self
                .resolved
                .get_or_try_init(|| lookup_goroot(compiler))
                .await
                .cloned(),
        }
    }
}

async fn lookup_goroot(compiler: &str) -> Result<PathBuf, String> {
    let output = Command::new(compiler)
        .args(["env", "GOROOT"])
        .output()
        .await
        .map_err(|e| {
            tracing::warn!(compiler, error = %e, "toolchain lookup failed");
            e.to_string()
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::warn!(compiler, status = %output.status, "{}", stderr);
        return Err(if stderr.is_empty() {
            format!("{} env GOROOT exited with {}", compiler, output.status)
        } else {
            stderr
        });
    }

    let goroot = PathBuf::from(String::from_utf8_lossy(&output.stdout).trim());
    Ok(script_in_goroot(&goroot).await)
}

/// First existing candidate, else the classic `misc/wasm` location.
async fn script_in_goroot(goroot: &Path) -> PathBuf {
    for candidate in GOROOT_CANDIDATES {
        let path = goroot.join(candidate);
        if tokio::fs::try_exists(&path).await.unwrap_or(false) {
            return path;
        }
    }
    goroot.join(GOROOT_CANDIDATES[1])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_override_is_returned_verbatim() {
        let script = RuntimeScript::from_path("/opt/go/misc/wasm/wasm_exec.js");
        assert_eq!(
            script.locate().await.unwrap(),
            PathBuf::from("/opt/go/misc/wasm/wasm_exec.js")
        );
    }

    #[tokio::test]
    async fn test_goroot_prefers_lib_layout() {
        let goroot = TempDir::new().unwrap();
        for rel in GOROOT_CANDIDATES {
            let path = goroot.path().join(rel);
            std::fs::create_dir_all(path.parent().unwrap()).unwrap();
            std::fs::write(&path, "// glue").unwrap();
        }
        assert_eq!(
            script_in_goroot(goroot.path()).await,
            goroot.path().join("lib/wasm/wasm_exec.js")
        );
    }

    #[tokio::test]
    async fn test_goroot_falls_back_to_misc() {
        let goroot = TempDir::new().unwrap();
        assert_eq!(
            script_in_goroot(goroot.path()).await,
            goroot.path().join("misc/wasm/wasm_exec.js")
        );
    }

    #[tokio::test]
    async fn test_missing_toolchain_is_error() {
        let script = RuntimeScript::from_toolchain("wasmserve-no-such-go-x9");
        assert!(script.locate().await.is_err());
    }
}
