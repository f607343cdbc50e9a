//! Per-request routing.
//!
//! A request walks an ordered list of [`Stage`]s. Each stage either returns a
//! [`Decision`] or passes; the first decision wins. The last stage always
//! decides, so every request gets an answer.
//!
//! File checks are made at the request-relative location under the project
//! root: `/web/index.html` looks at `<root>/web/index.html`. A file that
//! exists there always overrides the generated variant.

use super::bootstrap;
use super::state::ServerState;
use std::fs::Metadata;
use std::io;
use std::path::{Component, Path, PathBuf};

const INDEX_HTML: &str = "index.html";
const RUNTIME_SCRIPT: &str = "wasm_exec.js";
const CSS_SUFFIX: &str = ".css";

/// What to answer for a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// 303 See Other to this location
    Redirect(String),
    /// 200 with the generated bootstrap page
    Bootstrap(String),
    /// Serve this file
    File(PathBuf),
    /// Serve the request path from the project root
    Static,
    /// 500 with this text
    Error(String),
}

/// Routing stages in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    DirectoryRedirect,
    BootstrapPage,
    RuntimeScript,
    WasmBinary,
    CssAsset,
    StaticFallback,
}

/// The order stages are evaluated in.
pub const STAGES: [Stage; 6] = [
    Stage::DirectoryRedirect,
    Stage::BootstrapPage,
    Stage::RuntimeScript,
    Stage::WasmBinary,
    Stage::CssAsset,
    Stage::StaticFallback,
];

/// A URL path with its location under the project root.
#[derive(Debug, Clone)]
pub struct RequestPath<'a> {
    raw: &'a str,
    local: Option<PathBuf>,
}

impl<'a> RequestPath<'a> {
    /// `local` is `None` when the path tries to leave `root`.
    pub fn new(raw: &'a str, root: &Path) -> Self {
        let relative = Path::new(raw.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        Self {
            raw,
            local: (!escapes).then(|| root.join(relative)),
        }
    }

    pub fn raw(&self) -> &str {
        self.raw
    }

    /// Last path segment; empty for paths ending in `/`.
    pub fn base_name(&self) -> &str {
        self.raw.rsplit('/').next().unwrap_or_default()
    }

    pub fn local(&self) -> Option<&Path> {
        self.local.as_deref()
    }
}

impl Stage {
    /// Run this stage alone.
    pub async fn evaluate(self, state: &ServerState, request: &RequestPath<'_>) -> Option<Decision> {
        let result = match self {
            Stage::DirectoryRedirect => directory_redirect(request).await,
            Stage::BootstrapPage => bootstrap_page(state, request).await,
            Stage::RuntimeScript => runtime_script(state, request).await,
            Stage::WasmBinary => wasm_binary(state, request).await,
            Stage::CssAsset => Ok(css_asset(state, request)),
            Stage::StaticFallback => Ok(Some(Decision::Static)),
        };
        result.unwrap_or_else(|err| Some(Decision::Error(err.to_string())))
    }
}

/// Walk [`STAGES`] and return the first decision.
pub async fn route(state: &ServerState, path: &str) -> Decision {
    let request = RequestPath::new(path, state.root());
    for stage in STAGES {
        if let Some(decision) = stage.evaluate(state, &request).await {
            tracing::debug!(path, ?stage, ?decision, "routed");
            return decision;
        }
    }
    Decision::Static
}

async fn stat(path: &Path) -> io::Result<Option<Metadata>> {
    match tokio::fs::metadata(path).await {
        Ok(meta) => Ok(Some(meta)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

/// Whether the request-relative location exists. Escaping paths never do.
async fn exists_locally(request: &RequestPath<'_>, file: Option<&str>) -> io::Result<bool> {
    let Some(local) = request.local() else {
        return Ok(false);
    };
    let path = match file {
        Some(file) => local.join(file),
        None => local.to_path_buf(),
    };
    Ok(stat(&path).await?.is_some())
}

async fn directory_redirect(request: &RequestPath<'_>) -> io::Result<Option<Decision>> {
    if request.raw().ends_with('/') {
        return Ok(None);
    }
    let Some(local) = request.local() else {
        return Ok(None);
    };
    Ok(match stat(local).await? {
        Some(meta) if meta.is_dir() => Some(Decision::Redirect(format!("{}/", request.raw()))),
        _ => None,
    })
}

async fn bootstrap_page(
    state: &ServerState,
    request: &RequestPath<'_>,
) -> io::Result<Option<Decision>> {
    let index = match request.base_name() {
        "" => Some(INDEX_HTML),
        INDEX_HTML => None,
        _ => return Ok(None),
    };
    if exists_locally(request, index).await? {
        return Ok(None);
    }
    Ok(Some(match bootstrap::render(state.wasm_file(), state.argv()) {
        Some(html) => Decision::Bootstrap(html),
        None => Decision::Error("bootstrap template missing from binary".to_string()),
    }))
}

async fn runtime_script(
    state: &ServerState,
    request: &RequestPath<'_>,
) -> io::Result<Option<Decision>> {
    if request.base_name() != RUNTIME_SCRIPT || exists_locally(request, None).await? {
        return Ok(None);
    }
    Ok(Some(match state.runtime().locate().await {
        Ok(path) => Decision::File(path),
        Err(message) => Decision::Error(message),
    }))
}

async fn wasm_binary(state: &ServerState, request: &RequestPath<'_>) -> io::Result<Option<Decision>> {
    if request.base_name() != state.wasm_file() || exists_locally(request, None).await? {
        return Ok(None);
    }
    Ok(Some(Decision::File(state.wasm_path().to_path_buf())))
}

fn css_asset(state: &ServerState, request: &RequestPath<'_>) -> Option<Decision> {
    if !state.css_enabled() || !request.raw().ends_with(CSS_SUFFIX) {
        return None;
    }
    Some(match state.registry().resolve(request.raw()) {
        Some(path) => Decision::File(path),
        None => Decision::Error("css file not found".to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use crate::registry::{ArtifactDescriptor, AssetRegistry};
    use std::fs;
    use tempfile::TempDir;

    fn state_for(root: &Path, css: bool, registry: AssetRegistry) -> ServerState {
        let mut config = ProjectConfig {
            enable_tailwind: css,
            wasm_exec: "/opt/go/misc/wasm/wasm_exec.js".to_string(),
            ..ProjectConfig::default()
        };
        config.resolve_paths(root);
        ServerState::new(&config, registry, vec!["a".to_string(), "b".to_string()])
    }

    #[test]
    fn test_request_path_base_and_local() {
        let root = Path::new("/project");
        let req = RequestPath::new("/web/app.css", root);
        assert_eq!(req.base_name(), "app.css");
        assert_eq!(req.local(), Some(Path::new("/project/web/app.css")));

        let req = RequestPath::new("/", root);
        assert_eq!(req.base_name(), "");
        assert_eq!(req.local(), Some(Path::new("/project")));

        let req = RequestPath::new("/../etc/passwd", root);
        assert!(req.local().is_none());
    }

    #[tokio::test]
    async fn test_directory_redirect_stage() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("docs")).unwrap();
        let state = state_for(dir.path(), false, AssetRegistry::new());

        let req = RequestPath::new("/docs", dir.path());
        assert_eq!(
            Stage::DirectoryRedirect.evaluate(&state, &req).await,
            Some(Decision::Redirect("/docs/".to_string()))
        );

        let req = RequestPath::new("/docs/", dir.path());
        assert_eq!(Stage::DirectoryRedirect.evaluate(&state, &req).await, None);

        let req = RequestPath::new("/missing", dir.path());
        assert_eq!(Stage::DirectoryRedirect.evaluate(&state, &req).await, None);
    }

    #[tokio::test]
    async fn test_bootstrap_stage_yields_to_real_index() {
        let dir = TempDir::new().unwrap();
        let state = state_for(dir.path(), false, AssetRegistry::new());

        let req = RequestPath::new("/", dir.path());
        match Stage::BootstrapPage.evaluate(&state, &req).await {
            Some(Decision::Bootstrap(html)) => {
                assert!(html.contains("go.argv = [\"a\", \"b\"];"));
            }
            other => panic!("expected bootstrap page, got {:?}", other),
        }

        fs::write(dir.path().join("index.html"), "<h1>mine</h1>").unwrap();
        assert_eq!(Stage::BootstrapPage.evaluate(&state, &req).await, None);
        let req = RequestPath::new("/index.html", dir.path());
        assert_eq!(Stage::BootstrapPage.evaluate(&state, &req).await, None);

        let req = RequestPath::new("/about.html", dir.path());
        assert_eq!(Stage::BootstrapPage.evaluate(&state, &req).await, None);
    }

    #[tokio::test]
    async fn test_runtime_script_stage() {
        let dir = TempDir::new().unwrap();
        let state = state_for(dir.path(), false, AssetRegistry::new());
        let req = RequestPath::new("/wasm_exec.js", dir.path());

        assert_eq!(
            Stage::RuntimeScript.evaluate(&state, &req).await,
            Some(Decision::File(PathBuf::from("/opt/go/misc/wasm/wasm_exec.js")))
        );

        fs::write(dir.path().join("wasm_exec.js"), "// local").unwrap();
        assert_eq!(Stage::RuntimeScript.evaluate(&state, &req).await, None);
    }

    #[tokio::test]
    async fn test_wasm_binary_stage() {
        let dir = TempDir::new().unwrap();
        let state = state_for(dir.path(), false, AssetRegistry::new());
        let req = RequestPath::new("/main.wasm", dir.path());

        assert_eq!(
            Stage::WasmBinary.evaluate(&state, &req).await,
            Some(Decision::File(dir.path().join("tmp").join("main.wasm")))
        );

        let req = RequestPath::new("/other.wasm", dir.path());
        assert_eq!(Stage::WasmBinary.evaluate(&state, &req).await, None);
    }

    #[tokio::test]
    async fn test_css_stage() {
        let dir = TempDir::new().unwrap();
        let registry = AssetRegistry::new();
        registry.add(ArtifactDescriptor::prebuilt(dir.path().join("tmp/style.css")));

        let disabled = state_for(dir.path(), false, registry.clone());
        let req = RequestPath::new("/style.css", dir.path());
        assert_eq!(Stage::CssAsset.evaluate(&disabled, &req).await, None);

        let enabled = state_for(dir.path(), true, registry);
        assert_eq!(
            Stage::CssAsset.evaluate(&enabled, &req).await,
            Some(Decision::File(dir.path().join("tmp/style.css")))
        );

        let req = RequestPath::new("/missing.css", dir.path());
        assert!(matches!(
            Stage::CssAsset.evaluate(&enabled, &req).await,
            Some(Decision::Error(_))
        ));
    }

    #[tokio::test]
    async fn test_css_lookup_keeps_leading_slash() {
        let dir = TempDir::new().unwrap();
        let registry = AssetRegistry::new();
        registry.add(ArtifactDescriptor::prebuilt(dir.path().join("tmp/mystyle.css")));
        registry.add(ArtifactDescriptor::prebuilt(dir.path().join("tmp/style.css")));
        let state = state_for(dir.path(), true, registry);

        assert_eq!(
            route(&state, "/style.css").await,
            Decision::File(dir.path().join("tmp/style.css"))
        );
        assert_eq!(
            route(&state, "/mystyle.css").await,
            Decision::File(dir.path().join("tmp/mystyle.css"))
        );
    }

    #[tokio::test]
    async fn test_route_priority() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("styles.css")).unwrap();
        fs::write(dir.path().join("readme.txt"), "hi").unwrap();
        let state = state_for(dir.path(), true, AssetRegistry::new());

        // A directory redirect beats the CSS stage.
        assert_eq!(
            route(&state, "/styles.css").await,
            Decision::Redirect("/styles.css/".to_string())
        );
        assert_eq!(route(&state, "/readme.txt").await, Decision::Static);
        assert_eq!(route(&state, "/../secret").await, Decision::Static);
    }

    #[test]
    fn test_stage_order() {
        assert_eq!(STAGES.first(), Some(&Stage::DirectoryRedirect));
        assert_eq!(STAGES.last(), Some(&Stage::StaticFallback));
    }
}
