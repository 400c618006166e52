//! HTTP endpoint receiving GitHub organization webhooks.
use axum::{
    Router,
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use log::*;
use serde_json::Value;
use std::sync::Arc;

use crate::orchestrator::{Propagator, event::ReleaseEvent};

pub const EVENT_HEADER: &str = "x-github-event";
pub const MSG_NOT_FOUND: &str = "Resources not found.";
/// Only this release action starts a propagation; deliveries without an
/// action are treated as this one.
pub const PROPAGATED_ACTION: &str = "published";

/// Routes: `POST /{org}` for deliveries, `GET /health` for probes, and a
/// 404 for everything else.
pub fn router(propagator: Arc<Propagator>) -> Router {
    Router::new()
        .route("/health", get(health).fallback(not_found))
        .route("/{org}", post(handle_event).fallback(not_found))
        .fallback(not_found)
        .with_state(propagator)
}

async fn health() -> &'static str {
    "ok"
}

async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, MSG_NOT_FOUND).into_response()
}

fn is_json(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
}

fn reject(org: &str, err: String) -> Response {
    warn!("rejecting release delivery for {org}: {err}");
    (StatusCode::BAD_REQUEST, err).into_response()
}

async fn handle_event(
    State(propagator): State<Arc<Propagator>>,
    Path(org): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if !is_json(content_type) {
        return (
            StatusCode::BAD_REQUEST,
            format!(
                "Unsupported Content-Type `{content_type}`. Expect `application/json`."
            ),
        )
            .into_response();
    }

    let event_name = headers
        .get(EVENT_HEADER)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    if event_name != "release" {
        debug!("ignoring {event_name} event for {org}");
        return (
            StatusCode::ACCEPTED,
            format!("The event `{event_name}` isn't supported by this webhook."),
        )
            .into_response();
    }

    let payload = match serde_json::from_slice::<Value>(&body) {
        Ok(payload) => payload,
        Err(err) => return reject(&org, err.to_string()),
    };

    // GitHub sends created, published and released for one release
    let action = payload["action"].as_str().unwrap_or(PROPAGATED_ACTION);
    if action != PROPAGATED_ACTION {
        debug!("ignoring release action {action} for {org}");
        return (
            StatusCode::ACCEPTED,
            format!("The release action `{action}` isn't supported by this webhook."),
        )
            .into_response();
    }

    let event = match ReleaseEvent::from_payload(&org, &payload) {
        Ok(event) => event,
        Err(err) => return reject(&org, err.to_string()),
    };

    match propagator.propagate(&event).await {
        Ok(summary) => (StatusCode::OK, summary.render()).into_response(),
        Err(err) => {
            error!(
                "failed to propagate {}/{} {}: {err:#}",
                event.organization, event.repository, event.tag
            );
            (StatusCode::INTERNAL_SERVER_ERROR, format!("{err:#}"))
                .into_response()
        }
    }
}
