//! Plain-text rendering of gate state and directory data.

use chrono::NaiveDateTime;
use gate_core::{
    AccessLogEntry, AccessStatus, GateView, Registration, UserRecord, VerificationOutcome,
};
use gate_http::GateHttpClient;

/// Gate screen for the current view.
pub fn gate_view(view: &GateView) -> String {
    let mut lines = Vec::new();
    if let Some(credential) = &view.credential {
        lines.push(format!("QR: {credential}"));
    }
    if let Some(prompt) = &view.prompt {
        lines.push(prompt.message());
    }
    if let Some(result) = &view.result {
        lines.extend(result.lines().into_iter().map(str::to_string));
        if let Some(region) = result.face_region {
            lines.push(format!(
                "Twarz: x={} y={} w={} h={}",
                region.x, region.y, region.w, region.h
            ));
        }
    }
    lines.join("\n")
}

/// Extra outcome details not shown on the gate screen.
pub fn outcome_details(outcome: &VerificationOutcome) -> Option<String> {
    outcome.score().map(|score| format!("Zgodność: {score}%"))
}

/// Users table with printable QR links.
pub fn users(users: &[UserRecord], api: &GateHttpClient) -> String {
    if users.is_empty() {
        return "Brak użytkowników.".to_string();
    }
    let mut out = format!("{:>4}  {:<24}  {:<10}  {}", "ID", "NAME", "QR", "QR IMAGE");
    for user in users {
        out.push_str(&format!(
            "\n{:>4}  {:<24}  {:<10}  {}",
            user.id.0,
            user.name,
            user.qr,
            api.qr_image_url(user)
        ));
    }
    out
}

fn status_label(status: &AccessStatus) -> &str {
    match status {
        AccessStatus::Success => "SUCCESS",
        AccessStatus::DeniedQr => "DENIED_QR",
        AccessStatus::DeniedFace => "DENIED_FACE",
        AccessStatus::Other(label) => label,
    }
}

/// Trim server timestamps to whole seconds; unknown formats pass through.
pub fn log_time(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f")
        .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|_| raw.to_string())
}

/// Access log table, newest first.
pub fn logs(entries: &[AccessLogEntry], api: &GateHttpClient) -> String {
    if entries.is_empty() {
        return "Brak wpisów.".to_string();
    }
    let mut out = format!("{:<19}  {:<24}  {:<11}  {}", "TIME", "USER", "STATUS", "SNAPSHOT");
    for entry in entries {
        let snapshot = entry
            .snapshot
            .as_deref()
            .map(|path| api.url(path))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "\n{:<19}  {:<24}  {:<11}  {}",
            log_time(&entry.time),
            entry.user,
            status_label(&entry.status),
            snapshot
        ));
    }
    out
}

/// Result of a registration.
pub fn registration(registration: &Registration, api: &GateHttpClient) -> String {
    match &registration.qr_code {
        Some(qr) => format!(
            "{}\nQR: {}\n{}",
            registration.message,
            qr,
            api.url(&format!("/static/qrcodes/{qr}.png"))
        ),
        None => registration.message.clone(),
    }
}
