//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0, sizes > 0)
//! - Check that addresses parse
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: InspectorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use crate::config::schema::{InspectorConfig, StorageBackend};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field, e.g. `listener.bind_address`.
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration for semantic errors.
pub fn validate_config(config: &InspectorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::new("listener.tls.cert_path", "must not be empty"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::new("listener.tls.key_path", "must not be empty"));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.storage.backend == StorageBackend::Sqlite && config.storage.path.trim().is_empty() {
        errors.push(ValidationError::new(
            "storage.path",
            "required when backend is sqlite",
        ));
    }

    if config.capture.client_ip_headers.is_empty() {
        errors.push(ValidationError::new(
            "capture.client_ip_headers",
            "at least one header name is required",
        ));
    }
    if config
        .capture
        .client_ip_headers
        .iter()
        .any(|h| axum::http::HeaderName::from_bytes(h.as_bytes()).is_err())
    {
        errors.push(ValidationError::new(
            "capture.client_ip_headers",
            "contains an invalid header name",
        ));
    }
    if config.capture.max_body_size == 0 {
        errors.push(ValidationError::new("capture.max_body_size", "must be greater than 0"));
    }

    if config.generation.enabled {
        if config.generation.model.trim().is_empty() {
            errors.push(ValidationError::new("generation.model", "must not be empty"));
        }
        if url::Url::parse(&config.generation.base_url).is_err() {
            errors.push(ValidationError::new(
                "generation.base_url",
                format!("'{}' is not a valid URL", config.generation.base_url),
            ));
        }
        if config.generation.timeout_secs == 0 {
            errors.push(ValidationError::new(
                "generation.timeout_secs",
                "must be greater than 0",
            ));
        }
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TlsConfig;

    #[test]
    fn defaults_are_valid() {
        assert!(validate_config(&InspectorConfig::default()).is_ok());
    }

    #[test]
    fn collects_every_error() {
        let mut config = InspectorConfig::default();
        config.listener.bind_address = "nowhere".into();
        config.timeouts.request_secs = 0;
        config.observability.log_level = "loud".into();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "timeouts.request_secs",
                "observability.log_level"
            ]
        );
    }

    #[test]
    fn sqlite_needs_a_path() {
        let mut config = InspectorConfig::default();
        config.storage.path = "  ".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "storage.path");

        config.storage.backend = StorageBackend::Memory;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn generation_checks_skipped_when_disabled() {
        let mut config = InspectorConfig::default();
        config.generation.base_url = "not a url".into();
        assert!(validate_config(&config).is_err());

        config.generation.enabled = false;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn rejects_bad_ip_header_names() {
        let mut config = InspectorConfig::default();
        config.capture.client_ip_headers = vec!["bad header".into()];
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors[0].field, "capture.client_ip_headers");
    }

    #[test]
    fn empty_tls_paths_are_reported() {
        let mut config = InspectorConfig::default();
        config.listener.tls = Some(TlsConfig {
            cert_path: String::new(),
            key_path: "key.pem".into(),
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].to_string(), "listener.tls.cert_path: must not be empty");
    }
}
