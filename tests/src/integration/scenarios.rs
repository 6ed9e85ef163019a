//! # Gate Scenarios
//!
//! End-to-end runs of the gate over in-memory cameras and a scripted
//! verification service:
//!
//! 1. Granted and denied entries
//! 2. Upload fallback when the QR camera or the decoder fails
//! 3. Admin mode suspending the gate
//! 4. Cancellation: reset and admin toggles racing in-flight work

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures::future::join_all;
    use tokio::time::timeout;

    use gate_core::{
        CameraError, CameraRole, FaceRegion, GateApi, GateError, GateMode, GateStep, Prompt,
        ResultTone, VerificationOutcome, VerifyError,
    };

    use crate::fixtures::{jpeg_frame, MockGate, TEST_TIMEOUT};

    // =============================================================================
    // ENTRY OUTCOMES
    // =============================================================================

    #[tokio::test]
    async fn test_scenario_granted_entry() {
        let h = MockGate::new();
        h.gate.start().await.unwrap();
        h.gate.submit_credential("QR123").await.unwrap();
        h.verifier
            .respond_with(Ok(VerificationOutcome::granted("Alice").with_score(Some(93))));

        let outcome = h.gate.capture_and_verify(jpeg_frame()).await.unwrap();

        assert_eq!(outcome.subject_name(), Some("Alice"));
        assert_eq!(h.gate.step(), GateStep::ResultShown);
        let result = h.gate.view().result.unwrap();
        assert_eq!(result.tone, ResultTone::Granted);
        assert_eq!(result.lines(), vec!["DOSTĘP PRZYZNANY", "Witaj: Alice"]);
        assert_eq!(h.probe.open_count(), 0);
    }

    #[tokio::test]
    async fn test_scenario_denied_entry_with_face_box() {
        let h = MockGate::new();
        h.gate.start().await.unwrap();
        h.gate.submit_credential("QR123").await.unwrap();
        h.verifier.respond_with(Ok(VerificationOutcome::denied("face mismatch")
            .with_face_region(Some(FaceRegion::new(10, 10, 50, 50)))));

        h.gate.capture_and_verify(jpeg_frame()).await.unwrap();

        let result = h.gate.view().result.unwrap();
        assert_eq!(result.tone, ResultTone::Denied);
        assert_eq!(result.lines(), vec!["ODMOWA DOSTĘPU", "face mismatch"]);
        assert_eq!(result.face_region, Some(FaceRegion::new(10, 10, 50, 50)));
        assert!(jpeg_frame().contains(&FaceRegion::new(10, 10, 50, 50)));
    }

    #[tokio::test]
    async fn test_service_failure_then_retry() {
        let h = MockGate::new();
        h.gate.start().await.unwrap();
        h.gate.submit_credential("QR123").await.unwrap();
        h.verifier
            .respond_with(Err(VerifyError::Connection("refused".into())));

        let err = h.gate.capture_and_verify(jpeg_frame()).await.unwrap_err();
        assert!(err.is_recoverable());
        assert_eq!(h.gate.view().result.unwrap().headline, "Błąd serwera.");

        h.gate.reset().await.unwrap();
        h.gate.submit_credential("QR123").await.unwrap();
        assert!(h.gate.capture_from_camera().await.unwrap().is_granted());
    }

    // =============================================================================
    // UPLOAD FALLBACK
    // =============================================================================

    #[tokio::test]
    async fn test_scenario_upload_without_code() {
        let h = MockGate::new();
        h.gate.start().await.unwrap();
        let opened = h.probe.opened_total();

        let err = h
            .gate
            .scan_credential_image(b"holiday photo")
            .await
            .unwrap_err();

        assert_eq!(err, GateError::CredentialNotFound);
        assert_eq!(h.gate.step(), GateStep::AwaitingCredential);
        assert_eq!(h.probe.opened_total(), opened);
        assert_eq!(h.gate.camera_role(), Some(CameraRole::QrScanner));
        assert_eq!(
            h.gate.view().prompt.map(|p| p.message()),
            Some("Nie znaleziono kodu QR na tym zdjęciu.".to_string())
        );
    }

    #[tokio::test]
    async fn test_scenario_camera_denied_then_upload() {
        let h = MockGate::new();
        h.scanner.fail_with(Some(CameraError::PermissionDenied));
        h.scanner.register_image(b"badge.png".to_vec(), "QR123");

        let err = h.gate.start().await.unwrap_err();
        assert_eq!(err, GateError::CameraUnavailable(CameraError::PermissionDenied));
        assert!(matches!(h.gate.view().prompt, Some(Prompt::CameraUnavailable(_))));
        assert_eq!(h.gate.open_camera_handles(), 0);

        let token = h.gate.scan_credential_image(b"badge.png").await.unwrap();
        assert_eq!(token.as_str(), "QR123");
        assert_eq!(h.gate.step(), GateStep::AwaitingFace);
        assert_eq!(h.gate.camera_role(), Some(CameraRole::FaceCapture));
    }

    #[tokio::test]
    async fn test_live_scanner_feeds_face_step() {
        let h = MockGate::new();
        h.gate.start().await.unwrap();

        let gate = h.gate.clone();
        let scan = tokio::spawn(async move { gate.next_scanned_credential().await });
        tokio::time::sleep(Duration::from_millis(30)).await;
        h.scanner.show_code("QR-LIVE");

        let token = timeout(TEST_TIMEOUT, scan).await.unwrap().unwrap().unwrap();
        assert_eq!(token.as_str(), "QR-LIVE");
        assert_eq!(h.gate.step(), GateStep::AwaitingFace);
        assert_eq!(h.probe.peak(), 1);
    }

    #[tokio::test]
    async fn test_live_scan_cancelled_by_reset() {
        let h = MockGate::new();
        h.gate.start().await.unwrap();

        let gate = h.gate.clone();
        let scan = tokio::spawn(async move { gate.next_scanned_credential().await });
        tokio::time::sleep(Duration::from_millis(30)).await;
        h.gate.reset().await.unwrap();

        let result = timeout(TEST_TIMEOUT, scan).await.unwrap().unwrap();
        assert!(matches!(result, Err(GateError::Superseded { .. })));
        assert_eq!(h.gate.step(), GateStep::AwaitingCredential);
    }

    // =============================================================================
    // ADMIN MODE
    // =============================================================================

    #[tokio::test]
    async fn test_scenario_admin_round_trip_from_face_step() {
        let h = MockGate::new();
        h.gate.start().await.unwrap();
        h.gate.submit_credential("QR123").await.unwrap();
        assert_eq!(h.probe.open_count(), 1);
        let opened = h.probe.opened_total();

        h.gate.enter_admin_mode();
        assert_eq!(h.gate.mode(), GateMode::Admin);
        assert_eq!(h.probe.open_count(), 0);
        assert!(!h.gate.view().camera_live);

        h.gate.exit_admin_mode().await.unwrap();
        assert_eq!(h.gate.step(), GateStep::AwaitingCredential);
        assert_eq!(h.gate.camera_role(), Some(CameraRole::QrScanner));
        assert_eq!(h.probe.opened_total(), opened + 1);
        assert!(h.gate.credential().is_none());
    }

    #[tokio::test]
    async fn test_gate_calls_rejected_in_admin_mode() {
        let h = MockGate::new();
        h.gate.enter_admin_mode();

        assert!(matches!(
            h.gate.start().await,
            Err(GateError::InvalidState { mode: GateMode::Admin, .. })
        ));
        assert!(matches!(
            h.gate.capture_and_verify(jpeg_frame()).await,
            Err(GateError::InvalidState { .. })
        ));
        assert!(matches!(
            h.gate.scan_credential_image(b"x").await,
            Err(GateError::InvalidState { .. })
        ));
        assert_eq!(h.probe.opened_total(), 0);
    }

    // =============================================================================
    // CANCELLATION
    // =============================================================================

    #[tokio::test]
    async fn test_reset_releases_prior_handles() {
        let h = MockGate::new();
        h.gate.start().await.unwrap();
        h.gate.submit_credential("QR1").await.unwrap();

        h.scanner.fail_with(Some(CameraError::DeviceBusy));
        let err = h.gate.reset().await.unwrap_err();
        assert!(matches!(err, GateError::CameraUnavailable(_)));
        assert_eq!(h.gate.open_camera_handles(), 0);
        assert_eq!(h.probe.open_count(), 0);
        assert_eq!(h.gate.step(), GateStep::AwaitingCredential);

        h.scanner.fail_with(None);
        h.gate.reset().await.unwrap();
        assert_eq!(h.gate.open_camera_handles(), 1);
        assert_eq!(h.gate.camera_role(), Some(CameraRole::QrScanner));
    }

    #[tokio::test]
    async fn test_late_response_does_not_touch_new_attempt() {
        let h = MockGate::new();
        h.gate.start().await.unwrap();
        h.gate.submit_credential("QR-OLD").await.unwrap();
        h.verifier.hold();

        let gate = h.gate.clone();
        let stale = tokio::spawn(async move { gate.capture_and_verify(jpeg_frame()).await });
        h.verifier.wait_for_requests(1).await;

        h.gate.reset().await.unwrap();
        h.gate.submit_credential("QR-NEW").await.unwrap();
        h.verifier
            .respond_with(Ok(VerificationOutcome::granted("Mallory")));
        h.verifier.release(1);

        let result = timeout(TEST_TIMEOUT, stale).await.unwrap().unwrap();
        assert!(matches!(result, Err(GateError::Superseded { .. })));
        assert_eq!(h.gate.step(), GateStep::AwaitingFace);
        assert_eq!(h.gate.credential().unwrap().as_str(), "QR-NEW");
        assert!(h.gate.outcome().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_resets_keep_one_camera() {
        let h = MockGate::new();
        h.gate.start().await.unwrap();

        let resets = (0..16).map(|_| {
            let gate = h.gate.clone();
            tokio::spawn(async move { gate.reset().await })
        });
        for joined in join_all(resets).await {
            joined.unwrap().unwrap();
        }

        assert_eq!(h.gate.step(), GateStep::AwaitingCredential);
        assert!(h.probe.peak() <= 1);
        assert_eq!(h.probe.open_count(), h.gate.open_camera_handles());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_admin_toggle_races_credential() {
        let h = MockGate::new();
        h.gate.start().await.unwrap();

        let submit = {
            let gate = h.gate.clone();
            tokio::spawn(async move { gate.submit_credential("QR123").await })
        };
        h.gate.enter_admin_mode();
        let _ = submit.await.unwrap();

        assert_eq!(h.gate.mode(), GateMode::Admin);
        assert_eq!(h.probe.open_count(), 0);
        assert!(h.probe.peak() <= 1);
    }
}
