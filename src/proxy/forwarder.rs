//! Outbound request forwarding.
//!
//! # Responsibilities
//! - Build the outbound request: rewritten path, original query, original
//!   body as an unmodified byte stream
//! - Propagate only the allow-listed headers; strip identity and
//!   hop-by-hop headers
//! - Enforce the per-target deadline
//! - Relay the backend response verbatim, streamed, with hop-by-hop
//!   response headers removed
//!
//! # Design Decisions
//! - One shared hyper client per process: its pool leases connections
//!   across all concurrent requests and reclaims them on completion or drop
//! - Any backend status is passthrough; only transport failures and the
//!   deadline map to taxonomy errors
//! - One deadline covers the whole outbound call: connect, request write,
//!   response head, and the streamed body relay. A backend stalling
//!   mid-body aborts the stream (truncation) instead of holding the
//!   connection open forever
//! - The identity assertion never travels downstream

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;

use axum::body::{Body, Bytes};
use axum::http::{request, HeaderMap, Request, Response, Uri};
use axum::BoxError;
use hyper::body::{Body as HttpBody, Frame, Incoming, SizeHint};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tokio::time::{Instant, Sleep};
use url::Url;

use crate::config::{BackendsConfig, WebConfig};
use crate::error::GatewayError;
use crate::http::request::X_REQUEST_ID;
use crate::routing::{ResolvedRequest, Target};

/// Request headers the gateway forwards to backends. Everything else,
/// including the identity assertion and all cookies, is dropped.
const FORWARD_HEADERS: &[&str] = &[
    "content-type",
    "content-length",
    "accept",
    "accept-encoding",
    "user-agent",
    X_REQUEST_ID,
];

/// Hop-by-hop headers stripped from backend responses.
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Immutable description of one backend system.
///
/// Built at startup, shared read-only across all concurrent requests.
#[derive(Debug, Clone)]
pub struct BackendTarget {
    pub base_url: Url,
    pub timeout: Duration,
    /// Console-facing prefix removed before forwarding, when the backend
    /// expects paths without it.
    pub strip_prefix: Option<String>,
}

impl BackendTarget {
    fn new(base_url: &str, timeout_secs: u64, strip_prefix: Option<String>) -> Result<Self, url::ParseError> {
        Ok(Self {
            base_url: Url::parse(base_url)?,
            timeout: Duration::from_secs(timeout_secs),
            strip_prefix,
        })
    }
}

/// Generic forwarder: resolved request in, streamed backend response out.
pub struct ProxyForwarder {
    client: Client<HttpConnector, Body>,
    mesh_server: BackendTarget,
    directory: BackendTarget,
    log_store: BackendTarget,
    monitor: BackendTarget,
}

impl ProxyForwarder {
    pub fn new(backends: &BackendsConfig, web: &WebConfig) -> Result<Self, url::ParseError> {
        let client = Client::builder(TokioExecutor::new()).build(HttpConnector::new());

        Ok(Self {
            client,
            mesh_server: BackendTarget::new(
                &backends.mesh_server.base_url,
                backends.mesh_server.timeout_secs,
                Some(web.request_url.trim_end_matches('/').to_string()),
            )?,
            directory: BackendTarget::new(
                &backends.directory.base_url,
                backends.directory.timeout_secs,
                None,
            )?,
            log_store: BackendTarget::new(
                &backends.log_store.base_url,
                backends.log_store.timeout_secs,
                None,
            )?,
            monitor: BackendTarget::new(
                &backends.monitor.base_url,
                backends.monitor.timeout_secs,
                Some(web.monitor_url.trim_end_matches('/').to_string()),
            )?,
        })
    }

    /// The target for a proxied route. ConsolePage is served locally and
    /// has no backend.
    pub fn target(&self, target: Target) -> Option<&BackendTarget> {
        match target {
            Target::MeshServer => Some(&self.mesh_server),
            Target::Directory => Some(&self.directory),
            Target::LogStore => Some(&self.log_store),
            Target::Monitor => Some(&self.monitor),
            Target::ConsolePage => None,
        }
    }

    /// Forward the request to its resolved target and relay the response.
    pub async fn forward(
        &self,
        parts: &request::Parts,
        body: Body,
        resolved: &ResolvedRequest<'_>,
    ) -> Result<Response<Body>, GatewayError> {
        let target = self
            .target(resolved.rule.target)
            .ok_or(GatewayError::NotFound)?;

        // The deadline spans the entire call, body relay included.
        let deadline = Instant::now() + target.timeout;

        let uri = outbound_uri(
            &target.base_url,
            target.strip_prefix.as_deref(),
            &resolved.path,
            resolved.query.as_deref(),
        )?;

        let mut builder = Request::builder().method(parts.method.clone()).uri(uri);
        if let Some(headers) = builder.headers_mut() {
            copy_forward_headers(&parts.headers, headers);
        }
        let outbound = builder
            .body(body)
            .map_err(|_| GatewayError::UpstreamUnavailable)?;

        let response = match tokio::time::timeout_at(deadline, self.client.request(outbound)).await {
            Err(_) => {
                tracing::warn!(
                    target = resolved.rule.target.as_str(),
                    timeout = ?target.timeout,
                    "Backend exceeded deadline"
                );
                return Err(GatewayError::UpstreamTimeout);
            }
            Ok(Err(e)) => {
                tracing::error!(
                    target = resolved.rule.target.as_str(),
                    error = %e,
                    "Backend unreachable"
                );
                return Err(GatewayError::UpstreamUnavailable);
            }
            Ok(Ok(response)) => response,
        };

        // Verbatim passthrough: status, headers and streamed body, minus
        // hop-by-hop headers. The relay stays under the same deadline.
        let (mut head, incoming) = response.into_parts();
        for name in HOP_BY_HOP {
            head.headers.remove(*name);
        }
        let body = Body::new(DeadlineBody::new(incoming, deadline));
        Ok(Response::from_parts(head, body))
    }
}

/// Streamed relay of a backend body, bounded by the remainder of the
/// per-target deadline.
///
/// Covers both the backend read and the write back to a slow caller: the
/// body is polled by the server connection, so either side stalling past
/// the deadline errors the stream and releases the pooled connection.
struct DeadlineBody {
    inner: Incoming,
    deadline: Pin<Box<Sleep>>,
}

impl DeadlineBody {
    fn new(inner: Incoming, deadline: Instant) -> Self {
        Self {
            inner,
            deadline: Box::pin(tokio::time::sleep_until(deadline)),
        }
    }
}

impl HttpBody for DeadlineBody {
    type Data = Bytes;
    type Error = BoxError;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let this = self.get_mut();

        if this.deadline.as_mut().poll(cx).is_ready() {
            tracing::warn!("Backend body relay exceeded deadline, truncating");
            return Poll::Ready(Some(Err(
                "backend body relay exceeded the per-target deadline".into(),
            )));
        }

        match Pin::new(&mut this.inner).poll_frame(cx) {
            Poll::Ready(Some(Ok(frame))) => Poll::Ready(Some(Ok(frame))),
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e.into()))),
            Poll::Ready(None) => Poll::Ready(None),
            Poll::Pending => Poll::Pending,
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

/// Copy only the allow-listed headers onto the outbound request.
fn copy_forward_headers(inbound: &HeaderMap, outbound: &mut HeaderMap) {
    for name in FORWARD_HEADERS {
        for value in inbound.get_all(*name) {
            outbound.append(*name, value.clone());
        }
    }
}

/// Build the outbound URI: backend authority + rewritten path + original
/// query string.
fn outbound_uri(
    base_url: &Url,
    strip_prefix: Option<&str>,
    path: &str,
    query: Option<&str>,
) -> Result<Uri, GatewayError> {
    let rewritten = match strip_prefix {
        Some(prefix) if !prefix.is_empty() => match path.strip_prefix(prefix) {
            Some("") => "/",
            Some(rest) => rest,
            None => path,
        },
        _ => path,
    };

    let mut uri = format!("{}{}", base_url.as_str().trim_end_matches('/'), rewritten);
    if let Some(q) = query {
        uri.push('?');
        uri.push_str(q);
    }

    uri.parse::<Uri>().map_err(|e| {
        tracing::error!(error = %e, "Failed to build outbound URI");
        GatewayError::UpstreamUnavailable
    })
}
