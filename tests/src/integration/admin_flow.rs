//! # Admin Flow
//!
//! Admin console over the HTTP directory adapter, and its interplay with
//! the gate's mode switch.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use gate_core::{
        AccessStatus, AdminConsole, AdminError, GateApi, GateError, GateStep, PhotoUpload,
        StoreError, UserId,
    };

    use crate::fixtures::{HttpGate, JPEG_STUB};

    fn console(h: &HttpGate) -> AdminConsole {
        AdminConsole::new(h.gate.clone(), h.store.clone())
    }

    #[tokio::test]
    async fn test_admin_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/register"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"message": "Dodano", "qr_code": "a1b2c3d4"})),
            )
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/users"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "name": "Jan Kowalski", "qr": "a1b2c3d4", "photo": "/static/faces/jan.jpg"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/logs"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"time": "2024-05-01 08:00:00", "user": "Jan Kowalski", "status": "SUCCESS", "snapshot": null},
                {"time": "2024-05-01 07:59:00", "user": "Nieznany QR", "status": "DENIED_QR",
                 "snapshot": "/static/incidents/unknown_1.jpg"}
            ])))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/users/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "Usunięto"})))
            .expect(1)
            .mount(&server)
            .await;

        let h = HttpGate::new(&server.uri());
        h.gate.start().await.unwrap();
        h.gate.enter_admin_mode();
        assert_eq!(h.probe.open_count(), 0);

        let admin = console(&h);
        let registration = admin
            .register_user("Jan Kowalski", PhotoUpload::new("jan.jpg", JPEG_STUB.to_vec()))
            .await
            .unwrap();
        assert_eq!(registration.qr_code.as_deref(), Some("a1b2c3d4"));

        let snapshot = admin.refresh().await.unwrap();
        assert_eq!(snapshot.users[0].id, UserId(1));
        assert_eq!(snapshot.logs[1].status, AccessStatus::DeniedQr);

        admin.delete_user(UserId(1)).await.unwrap();

        h.gate.exit_admin_mode().await.unwrap();
        assert_eq!(h.gate.step(), GateStep::AwaitingCredential);
        assert_eq!(h.probe.open_count(), 1);
    }

    #[tokio::test]
    async fn test_console_refuses_outside_admin_mode() {
        let server = MockServer::start().await;
        let h = HttpGate::new(&server.uri());
        h.gate.start().await.unwrap();

        let err = console(&h).list_users().await.unwrap_err();
        assert!(matches!(err, AdminError::Gate(GateError::InvalidState { .. })));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_registration_rejected_by_backend() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/register"))
            .respond_with(
                ResponseTemplate::new(400).set_body_json(json!({"error": "Nie wykryto twarzy"})),
            )
            .mount(&server)
            .await;

        let h = HttpGate::new(&server.uri());
        h.gate.enter_admin_mode();

        let err = console(&h)
            .register_user("Jan", PhotoUpload::new("kot.jpg", JPEG_STUB.to_vec()))
            .await
            .unwrap_err();
        assert!(matches!(err, AdminError::Store(StoreError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_backend_unreachable() {
        let h = HttpGate::new("http://127.0.0.1:1");
        h.gate.enter_admin_mode();

        let err = console(&h).list_logs().await.unwrap_err();
        assert!(matches!(err, AdminError::Store(StoreError::Unavailable(_))));
    }
}
