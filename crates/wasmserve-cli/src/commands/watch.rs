//! Watch command implementation.
//!
//! Builds once, serves in-process, and rebuilds whenever a watched source
//! changes:
//! - Initial build (a failed wasm build is reported, the server still starts)
//! - HTTP server in a background task
//! - File watcher feeding the rebuild loop
//! - First Ctrl+C stops gracefully, a second one exits with code 2

use crate::cli::WatchArgs;
use crate::commands::build::build_project;
use crate::config::ProjectConfig;
use crate::error::{CliError, Result};
use crate::registry::AssetRegistry;
use crate::server::{DevServer, ServerState};
use crate::ui;
use crate::watch::{FileChange, FileWatcher, WatchFilter};
use tokio::signal;
use tokio::sync::{mpsc, watch};

/// Exit code used when a second Ctrl+C interrupts shutdown.
pub const FORCED_EXIT_CODE: i32 = 2;

/// Execute the watch command.
///
/// # Errors
///
/// Returns errors for:
/// - Invalid configuration
/// - Watcher start failures
/// - Server bind failures
pub async fn execute(args: WatchArgs) -> Result<()> {
    let config = ProjectConfig::load(args.config.as_deref(), &args.overrides())?;
    let registry = AssetRegistry::new();

    ui::info(&format!("Project root: {}", config.root.display()));
    let outcome = build_project(&config, &registry).await?;
    outcome.report();

    let filter = WatchFilter::from_config(&config)?;
    let (watcher, mut changes) = FileWatcher::new(filter, config.build.delay)?;
    ui::info(&format!("Watching for changes in: {}", watcher.root().display()));

    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(handle_interrupts(stop_tx));

    let state = ServerState::new(&config, registry.clone(), args.args);
    let server = DevServer::new(config.listen_addr()?, state).with_allow_origin(config.allow_origin());
    let mut server_stop = stop_rx.clone();
    let mut server_handle = tokio::spawn(server.run(async move {
        stopped(&mut server_stop).await;
    }));

    ui::info("Press Ctrl+C to stop");

    let mut stop = stop_rx;
    let result = loop {
        tokio::select! {
            Some(change) = changes.recv() => {
                let skipped = drain_pending(&mut changes);
                announce(&change, skipped);

                tokio::select! {
                    outcome = build_project(&config, &registry) => match outcome {
                        Ok(outcome) => outcome.report(),
                        Err(err) => ui::error(&format!("Rebuild failed: {}", err)),
                    },
                    _ = stopped(&mut stop) => {}
                }
            }

            _ = stopped(&mut stop) => {
                ui::info("Shutting down...");
                break wait_for_server(&mut server_handle).await;
            }

            joined = &mut server_handle => {
                break match joined {
                    Ok(result) => result,
                    Err(err) => Err(CliError::Server(format!("server task failed: {}", err))),
                };
            }
        }
    };

    drop(watcher);
    if config.misc.clean_on_exit {
        clean_tmp_dir(&config).await;
    }

    if result.is_ok() {
        ui::success("wasmserve stopped");
    }
    result
}

/// Flip `stop` on the first Ctrl+C and exit the process on the second.
async fn handle_interrupts(stop: watch::Sender<bool>) {
    if signal::ctrl_c().await.is_err() {
        return;
    }
    let _ = stop.send(true);

    if signal::ctrl_c().await.is_ok() {
        ui::warning("Interrupted again, exiting");
        std::process::exit(FORCED_EXIT_CODE);
    }
}

async fn stopped(stop: &mut watch::Receiver<bool>) {
    let _ = stop.wait_for(|stopped| *stopped).await;
}

async fn wait_for_server(handle: &mut tokio::task::JoinHandle<Result<()>>) -> Result<()> {
    match handle.await {
        Ok(result) => result,
        Err(err) => Err(CliError::Server(format!("server task failed: {}", err))),
    }
}

/// Discard changes queued behind the one that triggered the rebuild.
///
/// Returns how many were dropped.
fn drain_pending(changes: &mut mpsc::Receiver<FileChange>) -> usize {
    let mut dropped = 0;
    while changes.try_recv().is_ok() {
        dropped += 1;
    }
    dropped
}

fn announce(change: &FileChange, skipped: usize) {
    tracing::debug!(?change, skipped, "rebuild triggered");
    if skipped == 0 {
        ui::info(&format!("File changed: {}", change.path().display()));
    } else {
        ui::info(&format!(
            "File changed: {} (+{} more)",
            change.path().display(),
            skipped
        ));
    }
}

async fn clean_tmp_dir(config: &ProjectConfig) {
    match tokio::fs::remove_dir_all(&config.tmp_dir).await {
        Ok(()) => tracing::debug!(dir = %config.tmp_dir.display(), "removed build output"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => ui::warning(&format!(
            "Could not remove {}: {}",
            config.tmp_dir.display(),
            err
        )),
    }
}
