//! Terminal output for wasmserve.
//!
//! Status lines, spinners and the build summary are written to stderr so the
//! served program's own stdout stays untouched when wasmserve runs under
//! another tool.
//!
//! ```no_run
//! use wasmserve_cli::ui;
//!
//! let spinner = ui::Spinner::new("Compiling main.wasm...");
//! spinner.finish("main.wasm ready");
//! ui::success("Build complete");
//! ```

mod format;
mod messages;
mod spinner;

pub use format::{format_duration, format_size, print_build_summary, SummaryLine};
pub use messages::{error, info, success, warning};
pub use spinner::Spinner;

/// Check if running in a CI environment.
pub fn is_ci() -> bool {
    ["CI", "GITHUB_ACTIONS", "GITLAB_CI", "CIRCLECI", "TRAVIS"]
        .iter()
        .any(|var| std::env::var(var).is_ok())
}

/// Whether spinners should animate.
///
/// Animated output is noise in CI logs and when stderr is redirected.
pub fn interactive() -> bool {
    !is_ci() && console::user_attended_stderr()
}
