use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde_json::json;
use tracing::{error, info, warn};

use crate::types::{DispatchOutcome, DocumentPair, Payload};

/// Result of one outbound send attempt
///
/// Any non-2xx response or transport failure is a failure for that step;
/// the HTTP status is carried when one was received.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendResult {
    Success,
    Failure { status: Option<u16> },
}

impl SendResult {
    pub fn is_success(&self) -> bool {
        matches!(self, SendResult::Success)
    }

    fn status(&self) -> Option<u16> {
        match self {
            SendResult::Success => None,
            SendResult::Failure { status } => *status,
        }
    }
}

/// Outbound send boundary
#[async_trait]
pub trait SendCapability: Send + Sync {
    /// Post a body to the endpoint with the given content type
    async fn post(&self, endpoint: &str, content_type: &str, body: Bytes) -> SendResult;
}

/// reqwest-backed send capability
///
/// Optionally attaches the Cloudflare Access service-token headers the
/// destination sits behind in production.
pub struct HttpSender {
    client: Client,
    cf_access: Option<(String, String)>,
}

impl HttpSender {
    pub fn new() -> Self {
        let client = Client::builder()
            .user_agent("certsweep/0.2")
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            client,
            cf_access: None,
        }
    }

    /// Attach a Cloudflare Access service token to every send
    pub fn with_service_token(mut self, client_id: String, client_secret: String) -> Self {
        self.cf_access = Some((client_id, client_secret));
        self
    }

    /// Build a sender taking the service token from the environment
    /// (`CF_ACCESS_CLIENT_ID` / `CF_ACCESS_CLIENT_SECRET`)
    ///
    /// Missing variables mean the headers are omitted, which the
    /// destination may reject.
    pub fn from_env() -> Self {
        let id = std::env::var("CF_ACCESS_CLIENT_ID").ok();
        let secret = std::env::var("CF_ACCESS_CLIENT_SECRET").ok();

        match (id, secret) {
            (Some(id), Some(secret)) => Self::new().with_service_token(id, secret),
            _ => {
                warn!("CF_ACCESS_CLIENT_ID / CF_ACCESS_CLIENT_SECRET not set, sending without access headers");
                Self::new()
            }
        }
    }
}

impl Default for HttpSender {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SendCapability for HttpSender {
    async fn post(&self, endpoint: &str, content_type: &str, body: Bytes) -> SendResult {
        let mut request = self
            .client
            .post(endpoint)
            .header("Content-Type", content_type)
            .body(body);

        if let Some((id, secret)) = &self.cf_access {
            request = request
                .header("CF-Access-Client-Id", id.as_str())
                .header("CF-Access-Client-Secret", secret.as_str());
        }

        match request.send().await {
            Ok(response) if response.status().is_success() => SendResult::Success,
            Ok(response) => SendResult::Failure {
                status: Some(response.status().as_u16()),
            },
            Err(e) => SendResult::Failure {
                status: e.status().map(|s| s.as_u16()),
            },
        }
    }
}

/// Drives the two-phase send for one document pair
///
/// Phase 1 posts the structured payload as JSON; phase 2 posts the rendered
/// file's raw bytes, and runs only if phase 1 succeeded. A phase-1 failure
/// therefore never leaves an orphaned rendered upload on the receiving
/// side. A phase-2 failure is a genuine partial remote state and is
/// surfaced as its own outcome for manual reconciliation.
pub struct DispatchController<S: SendCapability + ?Sized> {
    sender: std::sync::Arc<S>,
    endpoint: String,
}

impl<S: SendCapability + ?Sized> DispatchController<S> {
    pub fn new(sender: std::sync::Arc<S>, endpoint: String) -> Self {
        Self { sender, endpoint }
    }

    /// Serialize the structured message for phase 1
    ///
    /// The payload fields are wrapped with the identifying metadata the
    /// destination needs to file the record.
    fn structured_body(pair: &DocumentPair, payload: &Payload) -> Vec<u8> {
        let body = json!({
            "documentKey": pair.key.as_str(),
            "fileName": pair.structured.name,
            "path": pair.structured.path,
            "sizeBytes": pair.structured.size,
            "modifiedAt": pair.structured.modified_at,
            "createdAt": pair.structured.created_at,
            "fields": payload.fields,
        });
        body.to_string().into_bytes()
    }

    /// Phase-2 endpoint with correlation parameters
    ///
    /// The rendered upload is raw bytes, so the document key and file name
    /// travel as query parameters for the receiver to match the upload
    /// with the structured record that preceded it.
    fn rendered_endpoint(&self, pair: &DocumentPair) -> String {
        reqwest::Url::parse_with_params(
            &self.endpoint,
            [
                ("documentKey", pair.key.as_str()),
                ("fileName", pair.rendered.name.as_str()),
            ],
        )
        .map(|url| url.to_string())
        .unwrap_or_else(|_| self.endpoint.clone())
    }

    /// Dispatch one pair: structured payload first, rendered bytes second
    pub async fn dispatch(
        &self,
        pair: &DocumentPair,
        payload: &Payload,
        rendered_content: Bytes,
    ) -> DispatchOutcome {
        let body = Bytes::from(Self::structured_body(pair, payload));

        let structured = self
            .sender
            .post(&self.endpoint, "application/json", body)
            .await;
        if !structured.is_success() {
            error!(
                key = %pair.key,
                status = ?structured.status(),
                "structured send failed, rendered send not attempted"
            );
            return DispatchOutcome::FailedStructuredSend {
                status: structured.status(),
            };
        }

        let content_type = mime_guess::from_path(&pair.rendered.name)
            .first_or_octet_stream()
            .to_string();

        let rendered = self
            .sender
            .post(&self.rendered_endpoint(pair), &content_type, rendered_content)
            .await;
        if !rendered.is_success() {
            error!(
                key = %pair.key,
                status = ?rendered.status(),
                "rendered send failed after structured send succeeded, manual reconciliation required"
            );
            return DispatchOutcome::FailedRenderedSend {
                status: rendered.status(),
            };
        }

        info!(key = %pair.key, "document pair dispatched");
        DispatchOutcome::Sent
    }
}
