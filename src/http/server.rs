//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Create the Axum router with the catch-all dispatch handler
//! - Wire up middleware (tracing, request ID)
//! - Own the per-request state machine:
//!   match → resource-resolve → auth-gate → forward → relay
//! - Map taxonomy errors to status codes; exactly one response per request
//!
//! # Design Decisions
//! - Every step is one-way; no retries anywhere in this layer
//! - The only cross-request state is the immutable table, guard, and
//!   forwarder, shared via Arc
//! - Route decision and outcome are logged with structured fields

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::any,
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;

use crate::auth::AuthGuard;
use crate::config::GatewayConfig;
use crate::error::GatewayError;
use crate::http::request::{RequestIdLayer, X_REQUEST_ID};
use crate::observability::metrics;
use crate::proxy::ProxyForwarder;
use crate::routing::{self, RouteTable, Target};
use crate::routing::table::RouteTableError;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
pub struct AppState {
    pub table: Arc<RouteTable>,
    pub guard: Arc<AuthGuard>,
    pub forwarder: Arc<ProxyForwarder>,
    /// Console index page, read once at startup. None when absent on disk.
    pub index_page: Option<Arc<String>>,
}

/// Error type for server construction.
#[derive(Debug)]
pub enum ServerInitError {
    Routes(RouteTableError),
    Backend(url::ParseError),
}

impl std::fmt::Display for ServerInitError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServerInitError::Routes(e) => write!(f, "route table: {}", e),
            ServerInitError::Backend(e) => write!(f, "backend target: {}", e),
        }
    }
}

impl std::error::Error for ServerInitError {}

/// HTTP server for the console gateway.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerInitError> {
        let table = RouteTable::build(&config.web).map_err(ServerInitError::Routes)?;
        let guard = AuthGuard::new(&config.auth);
        let forwarder =
            ProxyForwarder::new(&config.backends, &config.web).map_err(ServerInitError::Backend)?;

        let index_path = Path::new(&config.web.web_path).join("index.html");
        let index_page = match std::fs::read_to_string(&index_path) {
            Ok(page) => Some(Arc::new(page)),
            Err(e) => {
                tracing::warn!(path = %index_path.display(), error = %e, "Console index page unavailable");
                None
            }
        };

        let state = AppState {
            table: Arc::new(table),
            guard: Arc::new(guard),
            forwarder: Arc::new(forwarder),
            index_page,
        };

        let router = Router::new()
            .route("/{*path}", any(dispatch_handler))
            .route("/", any(dispatch_handler))
            .with_state(state)
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http());

        Ok(Self { router })
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Per-request dispatcher.
///
/// State machine, terminal on any exit:
/// Received → Matched → ResourceResolved → (AuthChecked) → Forwarded → Relayed.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let request_id = request
        .headers()
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let method = request.method().clone();
    let method_str = method.to_string();
    let path = request.uri().path().to_string();

    // 1. Match route
    let Some(rule) = state.table.lookup(&method, &path) else {
        tracing::warn!(request_id = %request_id, method = %method, path = %path, "No route matched");
        metrics::record_request(&method_str, 404, "none", start);
        return GatewayError::NotFound.into_response();
    };

    // The index page is served locally; everything else is proxied.
    if rule.target == Target::ConsolePage {
        let response = match &state.index_page {
            Some(page) => Html(page.as_ref().clone()).into_response(),
            None => StatusCode::NOT_FOUND.into_response(),
        };
        metrics::record_request(&method_str, response.status().as_u16(), rule.target.as_str(), start);
        return response;
    }

    // 2. Resolve resource placeholder
    let query = request.uri().query().map(str::to_string);
    let resolved = match routing::resolve(rule, &path, query.as_deref()) {
        Ok(resolved) => resolved,
        Err(e) => {
            tracing::warn!(request_id = %request_id, route = rule.name, path = %path, "Resource validation failed");
            metrics::record_request(&method_str, e.status().as_u16(), rule.target.as_str(), start);
            return e.into_response();
        }
    };

    // 3. Auth gate, only where the rule demands it
    if rule.requires_auth {
        let decision = state.guard.verify(request.headers());
        if !decision.allowed {
            let e = match decision.principal {
                None => GatewayError::Unauthenticated,
                Some(_) => GatewayError::Forbidden,
            };
            tracing::warn!(request_id = %request_id, route = rule.name, code = e.code(), "Identity assertion rejected");
            metrics::record_request(&method_str, e.status().as_u16(), rule.target.as_str(), start);
            return e.into_response();
        }
        tracing::debug!(
            request_id = %request_id,
            route = rule.name,
            principal = decision.principal.as_deref().unwrap_or(""),
            "Identity verified"
        );
    }

    // 4. Forward and relay
    let (parts, body) = request.into_parts();
    match state.forwarder.forward(&parts, body, &resolved).await {
        Ok(response) => {
            let status = response.status();
            tracing::debug!(
                request_id = %request_id,
                route = rule.name,
                target = rule.target.as_str(),
                status = status.as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Request relayed"
            );
            metrics::record_request(&method_str, status.as_u16(), rule.target.as_str(), start);
            response
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, route = rule.name, code = e.code(), "Forwarding failed");
            metrics::record_request(&method_str, e.status().as_u16(), rule.target.as_str(), start);
            e.into_response()
        }
    }
}
