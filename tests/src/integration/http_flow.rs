//! # HTTP Verification Flow
//!
//! The gate controller driving the reqwest verification adapter against a
//! wiremock backend that speaks the `/api/verify_entry` contract.

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;
    use tokio::time::timeout;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use gate_core::{FaceRegion, GateApi, GateError, GateStep, ResultTone};
    use gate_http::{ATTEMPT_HEADER, UNKNOWN_REASON, VERIFY_PATH};

    use crate::fixtures::{jpeg_frame, HttpGate, TEST_TIMEOUT};

    #[tokio::test]
    async fn test_granted_over_http() {
        let server = MockServer::start().await;
        let h = HttpGate::new(&server.uri());
        h.gate.start().await.unwrap();
        h.gate.submit_credential("QR123").await.unwrap();

        let attempt = h.gate.attempt().to_string();
        Mock::given(method("POST"))
            .and(path(VERIFY_PATH))
            .and(header(ATTEMPT_HEADER, attempt.as_str()))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "success", "user": "Alice", "score": 88, "face_rect": null
            })))
            .expect(1)
            .mount(&server)
            .await;

        let outcome = h.gate.capture_from_camera().await.unwrap();
        assert_eq!(outcome.subject_name(), Some("Alice"));
        assert_eq!(outcome.score(), Some(88));
        assert_eq!(h.gate.view().result.unwrap().tone, ResultTone::Granted);
    }

    #[tokio::test]
    async fn test_unknown_qr_is_denied() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(VERIFY_PATH))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "status": "denied", "reason": "Zły kod QR", "score": 0,
                "face_rect": {"x": 120, "y": 80, "w": 200, "h": 220}
            })))
            .mount(&server)
            .await;

        let h = HttpGate::new(&server.uri());
        h.gate.start().await.unwrap();
        h.gate.submit_credential("NOPE").await.unwrap();

        let outcome = h.gate.capture_and_verify(jpeg_frame()).await.unwrap();
        assert!(!outcome.is_granted());

        let result = h.gate.view().result.unwrap();
        assert_eq!(result.lines(), vec!["ODMOWA DOSTĘPU", "Zły kod QR"]);
        assert_eq!(result.face_region, Some(FaceRegion::new(120, 80, 200, 220)));
    }

    #[tokio::test]
    async fn test_denied_without_reason() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({"status": "denied"})))
            .mount(&server)
            .await;

        let h = HttpGate::new(&server.uri());
        h.gate.start().await.unwrap();
        h.gate.submit_credential("QR123").await.unwrap();

        let outcome = h.gate.capture_and_verify(jpeg_frame()).await.unwrap();
        assert_eq!(outcome.denial_reason(), Some(UNKNOWN_REASON));
    }

    #[tokio::test]
    async fn test_server_error_shows_error_result() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let h = HttpGate::new(&server.uri());
        h.gate.start().await.unwrap();
        h.gate.submit_credential("QR123").await.unwrap();

        let err = h.gate.capture_and_verify(jpeg_frame()).await.unwrap_err();
        assert!(matches!(err, GateError::ServiceUnavailable(_)));
        assert_eq!(h.gate.step(), GateStep::ResultShown);

        let result = h.gate.view().result.unwrap();
        assert_eq!(result.tone, ResultTone::Error);
        assert_eq!(result.headline, "Błąd serwera.");
    }

    #[tokio::test]
    async fn test_slow_backend_superseded_by_reset() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"status": "success", "user": "Alice"}))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let h = HttpGate::new(&server.uri());
        h.gate.start().await.unwrap();
        h.gate.submit_credential("QR123").await.unwrap();

        let gate = h.gate.clone();
        let pending = tokio::spawn(async move { gate.capture_and_verify(jpeg_frame()).await });
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(h.gate.step(), GateStep::Verifying);

        h.gate.reset().await.unwrap();

        let result = timeout(TEST_TIMEOUT, pending).await.unwrap().unwrap();
        assert!(matches!(result, Err(GateError::Superseded { .. })));
        assert_eq!(h.gate.step(), GateStep::AwaitingCredential);
        assert!(h.gate.view().result.is_none());
        assert_eq!(h.probe.open_count(), 1);
    }
}
