//! `VerificationService` over `POST /api/verify_entry`.

use async_trait::async_trait;
use gate_core::{VerificationOutcome, VerificationRequest, VerificationService, VerifyError};
use reqwest::multipart::{Form, Part};
use reqwest::StatusCode;
use tracing::debug;

use crate::client::{ApiError, GateHttpClient};
use crate::types::VerifyResponse;

/// Verification endpoint.
pub const VERIFY_PATH: &str = "/api/verify_entry";

/// Header carrying the attempt epoch of a request.
pub const ATTEMPT_HEADER: &str = "x-gate-attempt";

/// Remote face verification.
pub struct HttpVerificationService {
    api: GateHttpClient,
}

impl HttpVerificationService {
    /// Wrap a backend client.
    pub fn new(api: GateHttpClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl VerificationService for HttpVerificationService {
    async fn verify(&self, request: VerificationRequest) -> Result<VerificationOutcome, VerifyError> {
        let frame = Part::bytes(request.frame.jpeg.to_vec())
            .file_name("capture.jpg")
            .mime_str("image/jpeg")
            .map_err(|e| VerifyError::Malformed(e.to_string()))?;
        let form = Form::new()
            .text("qr_code", request.credential.as_str().to_owned())
            .part("frame", frame);

        debug!(attempt = %request.attempt, bytes = request.frame.len(), "POST {}", VERIFY_PATH);
        let response = self
            .api
            .http()
            .post(self.api.url(VERIFY_PATH))
            .header(ATTEMPT_HEADER, request.attempt.to_string())
            .multipart(form)
            .send()
            .await
            .map_err(|e| self.api.send_error(e))?;

        let status = response.status();
        if status != StatusCode::OK && status != StatusCode::FORBIDDEN {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: status.to_string(),
            }
            .into());
        }

        let (_, body): (_, VerifyResponse) = self.api.read_json(response).await?;
        body.into_outcome()
    }
}
