//! Telemetry configuration from environment variables.

use std::env;

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Service name attached to every event
    pub service_name: String,

    /// Filter directive (trace, debug, info, warn, error, or a full `EnvFilter` string)
    pub log_level: String,

    /// Whether to write events to stderr at all
    pub console_output: bool,

    /// Whether to format events as JSON lines
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: "faceid-gate".to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

impl TelemetryConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `GATE_SERVICE_NAME`: Service name (default: faceid-gate)
    /// - `GATE_LOG_LEVEL` or `RUST_LOG`: Log filter (default: info)
    /// - `GATE_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `GATE_JSON_LOGS`: Enable JSON logs (default: false in dev, true in containers)
    pub fn from_env() -> Self {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Same as [`TelemetryConfig::from_env`] with an explicit lookup.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Self {
        let is_container =
            var("KUBERNETES_SERVICE_HOST").is_some() || var("DOCKER_CONTAINER").is_some();
        let defaults = Self::default();

        Self {
            service_name: var("GATE_SERVICE_NAME").unwrap_or(defaults.service_name),

            log_level: var("GATE_LOG_LEVEL")
                .or_else(|| var("RUST_LOG"))
                .unwrap_or(defaults.log_level),

            console_output: var("GATE_CONSOLE_OUTPUT")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(true),

            json_logs: var("GATE_JSON_LOGS")
                .map(|v| v.to_lowercase() == "true" || v == "1")
                .unwrap_or(is_container),
        }
    }

    /// Override the filter, e.g. from a `--verbose` flag.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }
}
