//! Fan-out/fan-in CSS builds.

use super::executor::{BuildFailure, CssCompiler};
use crate::error::BuildError;
use crate::registry::{ArtifactDescriptor, AssetRegistry};
use crate::scan::{scan, ExclusionSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

const CSS_SUFFIX: &str = ".css";

/// Outcome of one [`BuildOrchestrator::build_all`] batch.
#[derive(Debug, Default)]
pub struct BuildReport {
    /// Artifacts that were built and registered.
    pub artifacts: Vec<ArtifactDescriptor>,
    /// Inputs that failed, with the reason.
    pub failures: Vec<BuildFailure>,
}

impl BuildReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn total(&self) -> usize {
        self.artifacts.len() + self.failures.len()
    }
}

/// Discovers CSS sources and compiles them concurrently into the registry.
pub struct BuildOrchestrator {
    registry: AssetRegistry,
    compiler: Arc<CssCompiler>,
    exclusions: ExclusionSet,
    concurrency: Option<usize>,
}

impl BuildOrchestrator {
    pub fn new(registry: AssetRegistry, compiler: CssCompiler, exclusions: ExclusionSet) -> Self {
        Self {
            registry,
            compiler: Arc::new(compiler),
            exclusions,
            concurrency: None,
        }
    }

    /// Cap simultaneously running tool processes. `0` means no cap.
    pub fn with_concurrency(mut self, limit: usize) -> Self {
        self.concurrency = (limit > 0).then_some(limit);
        self
    }

    pub fn registry(&self) -> &AssetRegistry {
        &self.registry
    }

    /// Compile every `.css` file under `root` and wait for all of them.
    ///
    /// Successes are registered as they finish. Failures are logged, kept out
    /// of the registry and returned in the report. A panicked task is
    /// reported as a failure for input `unknown`.
    pub async fn build_all(&self, root: &Path) -> BuildReport {
        let inputs = self.discover(root, CSS_SUFFIX).await;
        let mut report = BuildReport::default();
        if inputs.is_empty() {
            tracing::debug!(root = %root.display(), "no css sources found");
            return report;
        }

        if let Err(err) = tokio::fs::create_dir_all(self.compiler.out_dir()).await {
            tracing::warn!(
                dir = %self.compiler.out_dir().display(),
                error = %err,
                "could not create css output directory"
            );
        }

        let semaphore = self.concurrency.map(|n| Arc::new(Semaphore::new(n)));
        let mut tasks = JoinSet::new();

        for input in inputs {
            let compiler = Arc::clone(&self.compiler);
            let registry = self.registry.clone();
            let semaphore = semaphore.clone();

            tasks.spawn(async move {
                let _permit = match semaphore {
                    Some(semaphore) => semaphore.acquire_owned().await.ok(),
                    None => None,
                };
                let result = compiler.compile_one(&input).await;
                if let Ok(artifact) = &result {
                    registry.add(artifact.clone());
                }
                result
            });
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(Ok(artifact)) => {
                    tracing::debug!(output = %artifact.output_path().display(), "css built");
                    report.artifacts.push(artifact);
                }
                Ok(Err(failure)) => {
                    tracing::error!(input = %failure.input.display(), "{}", failure.error);
                    report.failures.push(failure);
                }
                Err(join_err) => {
                    tracing::error!("css build task panicked: {}", join_err);
                    report.failures.push(BuildFailure::new(
                        "unknown",
                        BuildError::TaskAborted {
                            input: PathBuf::from("unknown"),
                            reason: join_err.to_string(),
                        },
                    ));
                }
            }
        }

        report
    }

    /// Register `.css` files already present in `tmp_dir` without building.
    ///
    /// Returns how many were registered.
    pub async fn adopt_prebuilt(&self, tmp_dir: &Path) -> usize {
        let outputs = self.discover(tmp_dir, CSS_SUFFIX).await;
        let count = outputs.len();
        for output in outputs {
            self.registry.add(ArtifactDescriptor::prebuilt(output));
        }
        tracing::debug!(dir = %tmp_dir.display(), count, "adopted prebuilt css");
        count
    }

    async fn discover(&self, root: &Path, suffix: &'static str) -> Vec<PathBuf> {
        let root = root.to_path_buf();
        let exclusions = self.exclusions.clone();
        tokio::task::spawn_blocking(move || scan(&root, &exclusions, suffix))
            .await
            .unwrap_or_else(|err| {
                tracing::warn!("source scan task failed: {}", err);
                Vec::new()
            })
    }
}
