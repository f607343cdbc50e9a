//! Build pipeline: concurrent CSS compilation and the wasm compiler.
//!
//! - [`CssCompiler`] runs the CSS tool for a single input
//! - [`BuildOrchestrator`] scans for inputs, fans out one task per file and
//!   registers what succeeded in the [`AssetRegistry`](crate::registry::AssetRegistry)
//! - [`WasmBuild`] runs `go build` for `GOOS=js GOARCH=wasm`

mod executor;
mod orchestrator;
mod wasm;

pub use executor::{BuildFailure, CssCompiler, ToolInvocation};
pub use orchestrator::{BuildOrchestrator, BuildReport};
pub use wasm::{target_env, WasmBuild};
