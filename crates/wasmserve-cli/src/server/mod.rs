//! HTTP server for the compiled module, its runtime script, CSS, and static
//! files.
//!
//! The axum app has a single fallback handler. Which response a path gets is
//! decided by [`route`]; this module only turns that decision into a
//! response.

mod bootstrap;
mod router;
mod runtime;
mod state;

pub use bootstrap::{argv_literal, js_escape};
pub use router::{route, Decision, RequestPath, Stage, STAGES};
pub use runtime::RuntimeScript;
pub use state::ServerState;

use crate::error::{CliError, Result};
use axum::{
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Router,
};
use std::future::Future;
use std::net::SocketAddr;
use tower::ServiceExt;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};

/// Development HTTP server.
pub struct DevServer {
    addr: SocketAddr,
    allow_origin: Option<String>,
    state: ServerState,
}

impl DevServer {
    pub fn new(addr: SocketAddr, state: ServerState) -> Self {
        Self {
            addr,
            allow_origin: None,
            state,
        }
    }

    /// Send `Access-Control-Allow-Origin` on every response. `*` allows any
    /// origin.
    pub fn with_allow_origin(mut self, origin: Option<&str>) -> Self {
        self.allow_origin = origin.map(str::to_string);
        self
    }

    /// Build the axum app.
    pub fn router(&self) -> Result<Router> {
        let app = Router::new()
            .fallback(handle_request)
            .with_state(self.state.clone());

        let Some(origin) = &self.allow_origin else {
            return Ok(app);
        };

        let allow = if origin == "*" {
            AllowOrigin::from(Any)
        } else {
            let value = HeaderValue::from_str(origin).map_err(|_| {
                CliError::InvalidArgument(format!("'{}' is not a valid origin", origin))
            })?;
            AllowOrigin::exact(value)
        };
        Ok(app.layer(CorsLayer::new().allow_origin(allow)))
    }

    /// Serve until `shutdown` resolves.
    ///
    /// # Errors
    ///
    /// Returns error if the address cannot be bound.
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<()> {
        let app = self.router()?;
        let listener = tokio::net::TcpListener::bind(self.addr)
            .await
            .map_err(|e| CliError::Server(format!("Failed to bind to {}: {}", self.addr, e)))?;

        let local = listener.local_addr().unwrap_or(self.addr);
        crate::ui::success(&format!("Listening on {}", display_url(local)));

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
            .map_err(|e| CliError::Server(format!("Server error: {}", e)))?;

        Ok(())
    }
}

/// `http://localhost:8080` for wildcard binds, the address otherwise.
pub fn display_url(addr: SocketAddr) -> String {
    if addr.ip().is_unspecified() {
        format!("http://localhost:{}", addr.port())
    } else {
        format!("http://{}", addr)
    }
}

async fn handle_request(State(state): State<ServerState>, request: Request) -> Response {
    let path = request.uri().path().to_string();

    match route(&state, &path).await {
        Decision::Redirect(location) => Redirect::to(&location).into_response(),
        Decision::Bootstrap(html) => {
            ([(header::CACHE_CONTROL, "no-cache")], Html(html)).into_response()
        }
        Decision::File(file) => match ServeFile::new(file).oneshot(request).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        },
        Decision::Static => match ServeDir::new(state.root()).oneshot(request).await {
            Ok(response) => response.into_response(),
            Err(never) => match never {},
        },
        Decision::Error(message) => {
            tracing::warn!(path = %path, "{}", message);
            (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
        }
    }
}
