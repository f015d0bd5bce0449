//! Contact form endpoint.
//!
//! One request in, one response out. The steps run in a fixed order and the
//! first failure decides the response:
//!
//! 1. origin check (preflight answered here)
//! 2. method check
//! 3. relay credential present
//! 4. body parse
//! 5. honeypot
//! 6. sanitize and validate
//! 7. relay and map the upstream outcome

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, Method, StatusCode, header};
use axum::response::{IntoResponse, Response};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{ContactResponse, ProxyError};
use crate::payload::{ContactPayload, SanitizedSubmission};
use crate::relay::{RelayForm, RelayOutcome};
use crate::state::AppState;
use crate::validate::validate;

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";
const PREFLIGHT_MAX_AGE: &str = "86400";

/// Fallback client message when the upstream declines without saying why.
const SUBMISSION_FAILED: &str = "Submission failed";

/// Handle any request to the contact endpoint.
pub async fn handle_contact(
    State(state): State<Arc<AppState>>,
    method: Method,
    headers: HeaderMap,
    body: Body,
) -> Response {
    let origin = headers
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .filter(|o| state.allowlist.contains(o))
        .and_then(|o| HeaderValue::from_str(o).ok());

    let Some(origin) = origin else {
        debug!(%method, "origin rejected");
        if method == Method::OPTIONS {
            return StatusCode::FORBIDDEN.into_response();
        }
        return ProxyError::OriginNotAllowed.into_response();
    };

    if method == Method::OPTIONS {
        let mut response = StatusCode::NO_CONTENT.into_response();
        apply_cors(response.headers_mut(), origin);
        response.headers_mut().insert(
            header::ACCESS_CONTROL_MAX_AGE,
            HeaderValue::from_static(PREFLIGHT_MAX_AGE),
        );
        return response;
    }

    let mut response = match submit(&state, &method, body).await {
        Ok(reply) => (StatusCode::OK, axum::Json(reply)).into_response(),
        Err(e) => e.into_response(),
    };
    apply_cors(response.headers_mut(), origin);
    response
}

/// Steps 2 onward, for a request whose origin is already trusted.
async fn submit(
    state: &AppState,
    method: &Method,
    body: Body,
) -> Result<ContactResponse, ProxyError> {
    if *method != Method::POST {
        return Err(ProxyError::MethodNotAllowed);
    }

    let Some(access_key) = state.access_key.as_deref() else {
        warn!("relay access key is not configured; refusing submission");
        return Err(ProxyError::Misconfigured);
    };

    let bytes = axum::body::to_bytes(body, state.max_body_bytes)
        .await
        .map_err(|e| {
            debug!(error = %e, "failed to read request body");
            ProxyError::InvalidBody
        })?;
    let payload = ContactPayload::from_slice(&bytes).map_err(|e| {
        debug!(error = %e, "request body is not a JSON object");
        ProxyError::InvalidBody
    })?;

    if payload.is_bot() {
        info!("honeypot filled; dropping submission");
        return Ok(ContactResponse::ok());
    }

    let submission = SanitizedSubmission::from_payload(&payload);
    validate(&submission)?;

    let submission_id = Uuid::new_v4();
    info!(
        %submission_id,
        inquiry_type = %submission.inquiry_type,
        services = submission.services.len(),
        "relaying submission"
    );

    let form = RelayForm::from_submission(&submission, access_key);
    match state.relay.submit(&form).await? {
        RelayOutcome::Delivered => {
            info!(%submission_id, "submission delivered");
            Ok(ContactResponse::ok())
        }
        RelayOutcome::Rejected { message } => {
            warn!(%submission_id, upstream_message = ?message, "upstream declined submission");
            Err(ProxyError::SubmissionFailed(
                message.unwrap_or_else(|| SUBMISSION_FAILED.to_owned()),
            ))
        }
    }
}

fn apply_cors(headers: &mut HeaderMap, origin: HeaderValue) {
    headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
    headers.insert(header::VARY, HeaderValue::from_static("Origin"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(ALLOWED_HEADERS),
    );
}
