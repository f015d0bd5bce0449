//! Upstream relay.
//!
//! The [`Relay`] trait is the seam between the request handler and the
//! third-party form-delivery service. [`HttpRelay`] is the production
//! implementation: one multipart POST per submission, no retries.

use std::time::Duration;

use serde::Deserialize;
use tracing::warn;

use crate::payload::SanitizedSubmission;

/// Errors that mean the upstream could not be reached or refused at the
/// HTTP level. Both map to `502 Bad Gateway`.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    /// The HTTP client could not be constructed.
    #[error("relay client setup failed: {0}")]
    Setup(String),

    /// Connection, TLS, or timeout failure.
    #[error("upstream request failed: {0}")]
    Transport(String),

    /// The upstream answered with a non-2xx status.
    #[error("upstream returned HTTP {status}")]
    Status { status: u16 },
}

/// Result of a relay that reached the upstream and got a 2xx answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayOutcome {
    /// The upstream accepted the submission.
    Delivered,
    /// The upstream declined it, or its reply could not be understood.
    Rejected { message: Option<String> },
}

/// The multipart form sent upstream.
#[derive(Clone, PartialEq, Eq)]
pub struct RelayForm {
    pub access_key: String,
    pub subject: String,
    pub from_name: String,
    pub name: String,
    pub company: String,
    pub email: String,
    pub phone: String,
    pub inquiry_type: String,
    pub services: String,
    pub message: String,
}

impl std::fmt::Debug for RelayForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelayForm")
            .field("subject", &self.subject)
            .field("inquiry_type", &self.inquiry_type)
            .finish_non_exhaustive()
    }
}

impl RelayForm {
    /// Build the upstream form for `submission`.
    #[must_use]
    pub fn from_submission(submission: &SanitizedSubmission, access_key: &str) -> Self {
        Self {
            access_key: access_key.to_owned(),
            subject: Self::subject(submission),
            from_name: submission.name.clone(),
            name: submission.name.clone(),
            company: submission.company.clone(),
            email: submission.email.clone(),
            phone: submission.phone.clone(),
            inquiry_type: submission.inquiry_type.clone(),
            services: submission.services.join(", "),
            message: submission.message.clone(),
        }
    }

    /// Subject line for the delivered email.
    #[must_use]
    pub fn subject(submission: &SanitizedSubmission) -> String {
        let mut subject = format!(
            "New {} inquiry from {}",
            submission.inquiry_type, submission.name
        );
        if !submission.company.is_empty() {
            subject.push_str(&format!(" ({})", submission.company));
        }
        // Sanitized names keep newlines; a subject header must not.
        subject.replace('\n', " ")
    }

    /// Form fields in wire order.
    #[must_use]
    pub fn fields(&self) -> [(&'static str, &str); 10] {
        [
            ("access_key", self.access_key.as_str()),
            ("subject", self.subject.as_str()),
            ("from_name", self.from_name.as_str()),
            ("name", self.name.as_str()),
            ("company", self.company.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
            ("inquiry_type", self.inquiry_type.as_str()),
            ("services", self.services.as_str()),
            ("message", self.message.as_str()),
        ]
    }
}

/// Delivers a submission to the form service.
#[async_trait::async_trait]
pub trait Relay: Send + Sync + 'static {
    /// Submit `form` once.
    ///
    /// # Errors
    ///
    /// Returns [`RelayError`] when the upstream is unreachable or answers
    /// with a non-2xx status.
    async fn submit(&self, form: &RelayForm) -> Result<RelayOutcome, RelayError>;
}

/// Upstream JSON reply. Both fields are optional so that partial replies
/// still parse.
#[derive(Debug, Deserialize)]
struct UpstreamReply {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

/// Interpret a 2xx reply body.
///
/// Anything other than a JSON object with `"success": true` is a rejection.
/// An unparseable body is treated the same way rather than as a separate
/// protocol error.
#[must_use]
pub fn interpret_reply(body: &[u8]) -> RelayOutcome {
    match serde_json::from_slice::<UpstreamReply>(body) {
        Ok(UpstreamReply {
            success: Some(true),
            ..
        }) => RelayOutcome::Delivered,
        Ok(reply) => RelayOutcome::Rejected {
            message: reply.message.filter(|m| !m.trim().is_empty()),
        },
        Err(e) => {
            warn!(error = %e, "upstream reply was not valid JSON");
            RelayOutcome::Rejected { message: None }
        }
    }
}

/// Relay over HTTPS using `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpRelay {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRelay {
    /// # Errors
    ///
    /// Returns [`RelayError::Setup`] if the TLS backend cannot be initialized.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, RelayError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("atrium-proxy/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| RelayError::Setup(e.to_string()))?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl Relay for HttpRelay {
    async fn submit(&self, form: &RelayForm) -> Result<RelayOutcome, RelayError> {
        let multipart = form
            .fields()
            .into_iter()
            .fold(reqwest::multipart::Form::new(), |acc, (name, value)| {
                acc.text(name, value.to_owned())
            });

        let resp = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .multipart(multipart)
            .send()
            .await
            .map_err(|e| RelayError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(RelayError::Status {
                status: status.as_u16(),
            });
        }

        match resp.bytes().await {
            Ok(body) => Ok(interpret_reply(&body)),
            Err(e) => {
                warn!(error = %e, "failed to read upstream reply body");
                Ok(RelayOutcome::Rejected { message: None })
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};

    use axum::Router;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use tokio::net::TcpListener;

    use super::*;

    type Seen = Arc<Mutex<Vec<String>>>;

    fn submission() -> SanitizedSubmission {
        SanitizedSubmission {
            name: "Ada Lovelace".to_owned(),
            company: String::new(),
            email: "ada@example.com".to_owned(),
            phone: "+44 20 0000 0000".to_owned(),
            inquiry_type: "Partnership".to_owned(),
            services: vec!["Design".to_owned(), "Build".to_owned()],
            message: "Hello".to_owned(),
        }
    }

    #[test]
    fn subject_without_company() {
        assert_eq!(
            RelayForm::subject(&submission()),
            "New Partnership inquiry from Ada Lovelace"
        );
    }

    #[test]
    fn subject_with_company() {
        let sub = SanitizedSubmission {
            company: "Analytical Engines Ltd".to_owned(),
            ..submission()
        };
        assert_eq!(
            RelayForm::subject(&sub),
            "New Partnership inquiry from Ada Lovelace (Analytical Engines Ltd)"
        );
    }

    #[test]
    fn form_embeds_credential_and_joins_services() {
        let form = RelayForm::from_submission(&submission(), "key-1");
        let fields = form.fields();
        assert_eq!(fields[0], ("access_key", "key-1"));
        assert!(fields.contains(&("services", "Design, Build")));
        assert!(fields.contains(&("from_name", "Ada Lovelace")));
    }

    #[test]
    fn debug_hides_credential_and_contact_details() {
        let form = RelayForm::from_submission(&submission(), "key-1");
        let rendered = format!("{form:?}");
        assert!(!rendered.contains("key-1"));
        assert!(!rendered.contains("ada@example.com"));
    }

    #[test]
    fn reply_interpretation() {
        assert_eq!(interpret_reply(br#"{"success": true}"#), RelayOutcome::Delivered);
        assert_eq!(
            interpret_reply(br#"{"success": false, "message": "Invalid access key"}"#),
            RelayOutcome::Rejected {
                message: Some("Invalid access key".to_owned())
            }
        );
        assert_eq!(
            interpret_reply(br#"{"message": "ok?"}"#),
            RelayOutcome::Rejected {
                message: Some("ok?".to_owned())
            }
        );
        assert_eq!(
            interpret_reply(b"<html>oops</html>"),
            RelayOutcome::Rejected { message: None }
        );
        assert_eq!(
            interpret_reply(br#"{"success": false, "message": "  "}"#),
            RelayOutcome::Rejected { message: None }
        );
    }

    // ── HttpRelay against a local upstream ─────────────────────────

    async fn spawn_upstream() -> (SocketAddr, Seen) {
        let seen: Seen = Arc::new(Mutex::new(Vec::new()));
        let app = Router::new()
            .route(
                "/ok",
                post(|State(seen): State<Seen>, body: String| async move {
                    seen.lock().unwrap().push(body);
                    axum::Json(serde_json::json!({"success": true}))
                }),
            )
            .route(
                "/fail",
                post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
            )
            .route("/garbled", post(|| async { "<html>maintenance</html>" }))
            .with_state(Arc::clone(&seen));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });
        (addr, seen)
    }

    fn relay_to(addr: SocketAddr, path: &str) -> HttpRelay {
        // Loopback only; ignore any proxy configured in the environment.
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpRelay {
            client,
            endpoint: format!("http://{addr}{path}"),
        }
    }

    fn form() -> RelayForm {
        RelayForm::from_submission(&submission(), "key-1")
    }

    #[tokio::test]
    async fn delivered_reply_sends_every_field() {
        let (addr, seen) = spawn_upstream().await;
        let outcome = relay_to(addr, "/ok").submit(&form()).await.unwrap();
        assert_eq!(outcome, RelayOutcome::Delivered);

        let bodies = seen.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        let body = &bodies[0];
        for (name, _) in form().fields() {
            assert!(body.contains(&format!("name=\"{name}\"")), "missing field {name}");
        }
        assert!(body.contains("key-1"));
        assert!(body.contains("Design, Build"));
        assert!(body.contains("New Partnership inquiry from Ada Lovelace"));
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let (addr, _) = spawn_upstream().await;
        let result = relay_to(addr, "/fail").submit(&form()).await;
        assert!(matches!(result, Err(RelayError::Status { status: 500 })));
    }

    #[tokio::test]
    async fn non_json_success_is_a_rejection() {
        let (addr, _) = spawn_upstream().await;
        let outcome = relay_to(addr, "/garbled").submit(&form()).await.unwrap();
        assert_eq!(outcome, RelayOutcome::Rejected { message: None });
    }

    #[tokio::test]
    async fn closed_port_is_a_transport_error() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let result = relay_to(addr, "/ok").submit(&form()).await;
        assert!(matches!(result, Err(RelayError::Transport(_))));
    }

    #[test]
    fn endpoint_is_kept() {
        let relay = HttpRelay::new("https://forms.invalid/submit", Duration::from_secs(1)).unwrap();
        assert_eq!(relay.endpoint(), "https://forms.invalid/submit");
    }
}
