//! Run command implementation.
//!
//! Serves whatever is already in `tmp_dir`. Nothing is compiled.

use crate::cli::RunArgs;
use crate::commands::build::css_orchestrator;
use crate::config::ProjectConfig;
use crate::error::Result;
use crate::registry::AssetRegistry;
use crate::server::{DevServer, ServerState};
use crate::ui;
use tokio::signal;

/// Execute the run command.
///
/// # Errors
///
/// Returns errors for invalid configuration and bind failures.
pub async fn execute(args: RunArgs) -> Result<()> {
    let config = ProjectConfig::load(args.config.as_deref(), &args.overrides())?;
    let registry = adopt_existing(&config).await?;

    if !config.wasm_path().is_file() {
        ui::warning(&format!(
            "{} not found, run 'wasmserve build' first",
            config.wasm_path().display()
        ));
    }

    let state = ServerState::new(&config, registry, args.args);
    let server = DevServer::new(config.listen_addr()?, state).with_allow_origin(config.allow_origin());

    server
        .run(async {
            let _ = signal::ctrl_c().await;
            ui::info("Shutting down...");
        })
        .await
}

/// Registry holding the CSS outputs of a previous build.
pub async fn adopt_existing(config: &ProjectConfig) -> Result<AssetRegistry> {
    let registry = AssetRegistry::new();
    if config.enable_tailwind {
        let count = css_orchestrator(config, &registry)?
            .adopt_prebuilt(&config.tmp_dir)
            .await;
        ui::info(&format!("Serving {} prebuilt css file(s)", count));
    }
    Ok(registry)
}
