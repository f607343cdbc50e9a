//! Build command implementation.
//!
//! Compiles the CSS batch (when enabled) and the wasm module concurrently.
//! The same pipeline runs for every rebuild in watch mode.

use crate::build::{BuildOrchestrator, BuildReport, CssCompiler, ToolInvocation, WasmBuild};
use crate::cli::BuildArgs;
use crate::config::ProjectConfig;
use crate::error::{BuildError, ConfigError, Result, ResultExt};
use crate::registry::AssetRegistry;
use crate::scan::ExclusionSet;
use crate::ui::{self, SummaryLine};
use std::path::Path;
use std::time::{Duration, Instant};

/// Execute the build command.
///
/// # Errors
///
/// Returns errors for invalid configuration and for a failed wasm build.
/// CSS failures are reported but do not fail the command.
pub async fn execute(args: BuildArgs) -> Result<()> {
    let config = ProjectConfig::load(args.config.as_deref(), &args.overrides())?;
    let registry = AssetRegistry::new();

    let outcome = build_project(&config, &registry).await?;
    outcome.report();
    outcome.into_result()
}

/// Result of one full project build.
#[derive(Debug)]
pub struct BuildOutcome {
    /// CSS batch report, `None` when CSS is disabled
    pub css: Option<BuildReport>,
    /// Wasm compiler result
    pub wasm: std::result::Result<(), BuildError>,
    /// Output path of the wasm module
    pub wasm_path: std::path::PathBuf,
    pub elapsed: Duration,
}

impl BuildOutcome {
    /// Print per-failure output and the summary table.
    pub fn report(&self) {
        if let Some(css) = &self.css {
            for failure in &css.failures {
                ui::error(&failure.to_string());
            }
        }
        if let Err(err) = &self.wasm {
            ui::error(&err.to_string());
        }
        ui::print_build_summary(&self.summary_lines(), self.elapsed);
    }

    /// Rows for [`ui::print_build_summary`].
    pub fn summary_lines(&self) -> Vec<SummaryLine> {
        let mut lines = Vec::new();
        let wasm_name = file_name(&self.wasm_path);
        match &self.wasm {
            Ok(()) => lines.push(SummaryLine::built(wasm_name, file_size(&self.wasm_path))),
            Err(_) => lines.push(SummaryLine::failed(wasm_name)),
        }

        if let Some(css) = &self.css {
            for artifact in &css.artifacts {
                lines.push(SummaryLine::built(
                    artifact.file_name(),
                    file_size(artifact.output_path()),
                ));
            }
            for failure in &css.failures {
                lines.push(SummaryLine::failed(file_name(&failure.input)));
            }
        }
        lines
    }

    pub fn is_success(&self) -> bool {
        self.wasm.is_ok() && self.css.as_ref().map_or(true, BuildReport::is_success)
    }

    /// Fail when the wasm module could not be built.
    pub fn into_result(self) -> Result<()> {
        self.wasm.map_err(Into::into)
    }
}

/// Build CSS and wasm for `config`.
///
/// On return `registry` holds exactly the CSS outputs of this build; entries
/// from earlier builds are dropped.
pub async fn build_project(config: &ProjectConfig, registry: &AssetRegistry) -> Result<BuildOutcome> {
    let started = Instant::now();
    tokio::fs::create_dir_all(&config.tmp_dir)
        .await
        .with_path(&config.tmp_dir)?;

    // Filled by this batch only, then swapped into `registry`.
    let staged = AssetRegistry::new();
    let orchestrator = if config.enable_tailwind {
        Some(css_orchestrator(config, &staged)?)
    } else {
        None
    };
    let wasm = WasmBuild::from_config(config);

    let spinner = ui::Spinner::new(&format!("Compiling {}...", config.wasm_file));
    let css_batch = async {
        match &orchestrator {
            Some(orchestrator) => Some(orchestrator.build_all(&config.root).await),
            None => None,
        }
    };
    let (css, wasm_result) = tokio::join!(css_batch, wasm.run());
    registry.replace(staged.snapshot());

    match &wasm_result {
        Ok(_) => spinner.finish(&format!("{} built", config.wasm_file)),
        Err(_) => spinner.fail(&format!("{} failed", config.wasm_file)),
    }

    Ok(BuildOutcome {
        css,
        wasm: wasm_result.map(|_| ()),
        wasm_path: wasm.output().to_path_buf(),
        elapsed: started.elapsed(),
    })
}

/// Orchestrator compiling every CSS source under `config.root` into
/// `config.tmp_dir`.
pub fn css_orchestrator(config: &ProjectConfig, registry: &AssetRegistry) -> Result<BuildOrchestrator> {
    let tool = ToolInvocation::parse(&config.tailwind_exec).ok_or_else(|| ConfigError::MissingField {
        field: "tailwind_exec".to_string(),
        hint: "Set tailwind_exec, e.g. \"npx tailwindcss\"".to_string(),
    })?;
    let compiler = CssCompiler::new(tool, &config.tmp_dir, &config.root);

    Ok(BuildOrchestrator::new(
        registry.clone(),
        compiler,
        ExclusionSet::new(config.build.exclude_dir.iter().cloned()),
    )
    .with_concurrency(config.build.concurrency))
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn file_size(path: &Path) -> Option<u64> {
    std::fs::metadata(path).ok().map(|m| m.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::build::BuildFailure;
    use crate::registry::ArtifactDescriptor;
    use std::path::PathBuf;

    fn outcome(wasm_ok: bool, css: Option<BuildReport>) -> BuildOutcome {
        BuildOutcome {
            css,
            wasm: if wasm_ok {
                Ok(())
            } else {
                Err(BuildError::NoFileName(PathBuf::from("/")))
            },
            wasm_path: PathBuf::from("/nonexistent/tmp/main.wasm"),
            elapsed: Duration::from_millis(5),
        }
    }

    #[test]
    fn test_summary_lines() {
        let report = BuildReport {
            artifacts: vec![ArtifactDescriptor::compiled(
                PathBuf::from("/nonexistent/tmp/app.css"),
                PathBuf::from("/nonexistent/app.css"),
            )],
            failures: vec![BuildFailure::new(
                "/nonexistent/broken.css",
                BuildError::NoFileName(PathBuf::from("/")),
            )],
        };
        let outcome = outcome(true, Some(report));
        let lines = outcome.summary_lines();

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].label, "main.wasm");
        assert!(!lines[0].failed);
        assert_eq!(lines[1].label, "app.css");
        assert_eq!(lines[2].label, "broken.css");
        assert!(lines[2].failed);
        assert!(!outcome.is_success());
        assert!(outcome.into_result().is_ok());
    }

    #[test]
    fn test_wasm_failure_fails_command() {
        let outcome = outcome(false, None);
        assert!(outcome.summary_lines()[0].failed);
        assert!(outcome.into_result().is_err());
    }

    #[test]
    fn test_css_orchestrator_requires_exec() {
        let config = ProjectConfig {
            enable_tailwind: true,
            tailwind_exec: " ".to_string(),
            ..ProjectConfig::default()
        };
        assert!(css_orchestrator(&config, &AssetRegistry::new()).is_err());
    }
}
