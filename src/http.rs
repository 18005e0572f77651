//! HTTP surface: liveness probe and the Slack Events API endpoint.
//!
//! `GET /health` is always mounted. `POST /slack/events` is mounted only
//! for the HTTP transport; every request must carry a valid Slack
//! signature before its body is parsed.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use slack_morphism::prelude::SlackPushEvent;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app::AppState;
use crate::config::SlackTransport;
use crate::slack::{events, signature};
use crate::{AppError, Result};

/// Handler for `GET /health`.
async fn health() -> &'static str {
    "ok"
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> &'a str {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
}

/// Handler for `POST /slack/events`.
async fn slack_events(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if let Err(err) = signature::verify(
        &state.config.slack.signing_secret,
        header(&headers, "X-Slack-Request-Timestamp"),
        header(&headers, "X-Slack-Signature"),
        &body,
        chrono::Utc::now().timestamp(),
    ) {
        warn!(%err, "rejected slack request");
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let event: SlackPushEvent = match serde_json::from_slice(&body) {
        Ok(event) => event,
        Err(err) => {
            warn!(%err, "malformed slack event body");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match event {
        SlackPushEvent::UrlVerification(verification) => {
            info!("answering url verification challenge");
            Json(json!({ "challenge": verification.challenge })).into_response()
        }
        SlackPushEvent::EventCallback(callback) => {
            events::dispatch_event(&state, callback.event);
            StatusCode::OK.into_response()
        }
        _ => {
            debug!("ignoring slack push event");
            StatusCode::OK.into_response()
        }
    }
}

/// Build the router for `state`.
pub fn router(state: Arc<AppState>) -> Router {
    let router = Router::new().route("/health", get(health));
    let router = match state.config.slack.transport {
        SlackTransport::Http => router.route("/slack/events", post(slack_events)),
        SlackTransport::Socket => router,
    };
    router.with_state(state)
}

/// Bind the HTTP listener on all interfaces.
///
/// # Errors
///
/// Returns `AppError::Http` if the port cannot be bound.
pub async fn bind(port: u16) -> Result<TcpListener> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    TcpListener::bind(addr)
        .await
        .map_err(|err| AppError::Http(format!("failed to bind {addr}: {err}")))
}

/// Serve [`router`] on `listener` until `ct` is cancelled.
///
/// # Errors
///
/// Returns `AppError::Http` if the server fails.
pub async fn serve(listener: TcpListener, state: Arc<AppState>, ct: CancellationToken) -> Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "http server listening");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(ct.cancelled_owned())
        .await
        .map_err(|err| AppError::Http(format!("http server failed: {err}")))
}
