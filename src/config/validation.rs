//! Configuration validation.
//!
//! Semantic checks on top of what serde already guarantees syntactically.
//! Returns all validation errors, not just the first, so a broken config
//! can be fixed in one pass.

use std::fmt;

use crate::config::schema::ServiceConfig;

/// A single semantic validation failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "server.bind_address").
    pub field: String,
    /// Human-readable description of the problem.
    pub message: String,
}

impl ValidationError {
    fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Validate a configuration, collecting every problem found.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.server.bind_address.is_empty() {
        errors.push(ValidationError::new(
            "server.bind_address",
            "must not be empty",
        ));
    } else if config.server.bind_address.parse::<std::net::SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "server.bind_address",
            format!("'{}' is not a valid socket address", config.server.bind_address),
        ));
    }

    if config.server.request_timeout_secs == 0 {
        errors.push(ValidationError::new(
            "server.request_timeout_secs",
            "must be greater than zero",
        ));
    }

    if config.server.max_body_size == 0 {
        errors.push(ValidationError::new(
            "server.max_body_size",
            "must be greater than zero",
        ));
    }

    if config.storage.data_dir.is_empty() {
        errors.push(ValidationError::new("storage.data_dir", "must not be empty"));
    }

    if config.storage.log_dir.is_empty() {
        errors.push(ValidationError::new("storage.log_dir", "must not be empty"));
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

    #[test]
    fn default_config_validates() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = ServiceConfig::default();
        config.server.bind_address = "not-an-address".to_string();
        config.server.request_timeout_secs = 0;
        config.storage.data_dir = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.field == "server.bind_address"));
        assert!(errors.iter().any(|e| e.field == "server.request_timeout_secs"));
        assert!(errors.iter().any(|e| e.field == "storage.data_dir"));
    }
}
