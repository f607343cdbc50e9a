//! Init command implementation.
//!
//! Writes `wasmserve.toml` (and optionally `tailwind.config.js`) into the
//! current directory, and can fetch the standalone Tailwind executable.

use crate::assets;
use crate::cli::InitArgs;
use crate::config::{ProjectConfig, DEFAULT_CONFIG_FILE, DEFAULT_TAILWIND_EXEC};
use crate::error::{CliError, Result, ResultExt};
use crate::ui;
use dialoguer::{Confirm, Input, Select};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const TAILWIND_CONFIG_FILE: &str = "tailwind.config.js";
const LOCAL_TAILWIND_EXEC: &str = "./tailwindcss";
const LOCAL_TAILWIND_BINARY: &str = "tailwindcss";
const TAILWIND_RELEASE_URL: &str = "https://github.com/tailwindlabs/tailwindcss/releases/latest/download";
const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Answers collected by the init prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitChoices {
    pub enable_tailwind: bool,
    pub tailwind_exec: String,
    pub write_tailwind_config: bool,
    /// Fetch the standalone executable into the project directory
    pub download_tailwind: bool,
}

impl Default for InitChoices {
    fn default() -> Self {
        Self {
            enable_tailwind: false,
            tailwind_exec: DEFAULT_TAILWIND_EXEC.to_string(),
            write_tailwind_config: false,
            download_tailwind: false,
        }
    }
}

/// Execute the init command.
///
/// # Errors
///
/// Returns errors for:
/// - An existing `wasmserve.toml` without `--force`
/// - Prompt failures (for example no terminal attached)
/// - File write failures
/// - A failed Tailwind download
pub async fn execute(args: InitArgs) -> Result<()> {
    let cwd = std::env::current_dir()?;
    ensure_writable(&cwd, args.force)?;

    let choices = if args.yes {
        InitChoices::default()
    } else {
        prompt_choices()?
    };

    for path in write_project(&cwd, &choices)? {
        let name = path.strip_prefix(&cwd).unwrap_or(&path);
        ui::success(&format!("Created {}", name.display()));
    }

    if choices.enable_tailwind && choices.download_tailwind {
        download_tailwind(&cwd).await?;
    }
    eprintln!();
    ui::info("Start your wasm server with: wasmserve watch");
    Ok(())
}

fn ensure_writable(dir: &Path, force: bool) -> Result<()> {
    let config_path = dir.join(DEFAULT_CONFIG_FILE);
    if config_path.exists() && !force {
        return Err(CliError::InvalidArgument(format!(
            "{} already exists (use --force to overwrite)",
            config_path.display()
        )));
    }
    Ok(())
}

fn prompt_choices() -> Result<InitChoices> {
    let enable_tailwind = Confirm::new()
        .with_prompt("Enable Tailwind CSS?")
        .default(true)
        .interact()?;

    if !enable_tailwind {
        return Ok(InitChoices::default());
    }

    let options = [
        "npx tailwindcss",
        "Download the standalone executable to ./tailwindcss",
        "Enter a command manually",
    ];
    let selection = Select::new()
        .with_prompt("Which Tailwind CLI should be used?")
        .items(&options)
        .default(0)
        .interact()?;

    let tailwind_exec = match selection {
        0 => DEFAULT_TAILWIND_EXEC.to_string(),
        1 => LOCAL_TAILWIND_EXEC.to_string(),
        _ => Input::<String>::new()
            .with_prompt("Tailwind command")
            .validate_with(|input: &String| {
                if input.trim().is_empty() {
                    Err("command cannot be empty")
                } else {
                    Ok(())
                }
            })
            .interact_text()?,
    };

    let download_tailwind = selection == 1;
    let write_tailwind_config = Confirm::new()
        .with_prompt("Write the default tailwind.config.js?")
        .default(true)
        .interact()?;

    Ok(InitChoices {
        enable_tailwind,
        tailwind_exec: tailwind_exec.trim().to_string(),
        write_tailwind_config,
        download_tailwind,
    })
}

/// Config generated for `choices`.
pub fn generated_config(choices: &InitChoices) -> ProjectConfig {
    let mut config = ProjectConfig {
        enable_tailwind: choices.enable_tailwind,
        tailwind_exec: choices.tailwind_exec.clone(),
        ..ProjectConfig::default()
    };
    config.misc.clean_on_exit = true;
    config
}

/// Write the generated files into `dir`, returning their paths.
pub fn write_project(dir: &Path, choices: &InitChoices) -> Result<Vec<PathBuf>> {
    let mut written = Vec::new();

    let config_path = dir.join(DEFAULT_CONFIG_FILE);
    let content = generated_config(choices).to_toml()?;
    fs::write(&config_path, content).with_path(&config_path)?;
    written.push(config_path);

    if choices.enable_tailwind && choices.write_tailwind_config {
        let tailwind_path = dir.join(TAILWIND_CONFIG_FILE);
        if tailwind_path.exists() {
            ui::warning(&format!("{} exists, leaving it alone", TAILWIND_CONFIG_FILE));
        } else {
            let template = assets::tailwind_config()
                .ok_or_else(|| CliError::Custom("embedded tailwind.config.js missing".to_string()))?;
            fs::write(&tailwind_path, template).with_path(&tailwind_path)?;
            written.push(tailwind_path);
        }
    }

    Ok(written)
}

/// Release asset URL of the standalone Tailwind CLI.
///
/// `os` and `arch` use the names of [`std::env::consts`]. Unknown systems
/// fall back to Windows, unknown non-ARM architectures to x64.
pub fn tailwind_download_url(os: &str, arch: &str) -> String {
    let (os, suffix) = match os {
        "macos" => ("macos", ""),
        "linux" => ("linux", ""),
        _ => ("windows", ".exe"),
    };
    let arch = if arch.contains("arm") || arch == "aarch64" {
        "arm64"
    } else {
        "x64"
    };
    format!("{}/tailwindcss-{}-{}{}", TAILWIND_RELEASE_URL, os, arch, suffix)
}

/// Download the Tailwind executable for this machine into `dir`.
pub async fn download_tailwind(dir: &Path) -> Result<PathBuf> {
    let url = tailwind_download_url(std::env::consts::OS, std::env::consts::ARCH);
    let target = dir.join(LOCAL_TAILWIND_BINARY);

    let spinner = ui::Spinner::new(&format!("Downloading {}...", url));
    match fetch_executable(&url, &target).await {
        Ok(size) => {
            spinner.finish(&format!(
                "Downloaded {} ({})",
                LOCAL_TAILWIND_BINARY,
                ui::format_size(size)
            ));
            Ok(target)
        }
        Err(err) => {
            spinner.fail(&format!("Could not download {}", LOCAL_TAILWIND_BINARY));
            Err(err)
        }
    }
}

async fn fetch_executable(url: &str, target: &Path) -> Result<u64> {
    let client = reqwest::Client::builder().timeout(DOWNLOAD_TIMEOUT).build()?;
    let response = client.get(url).send().await?.error_for_status()?;
    let body = response.bytes().await?;
    tracing::debug!(url, bytes = body.len(), "tailwind download complete");

    tokio::fs::write(target, &body).await.with_path(target)?;
    make_executable(target)?;
    Ok(body.len() as u64)
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).with_path(path)
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
