//! Standardized error handling for registry HTTP exchanges

use crate::error::RegistryError;
use reqwest::StatusCode;

/// Maps unsuccessful registry responses to readable errors
pub struct HttpErrorHandler;

impl HttpErrorHandler {
    /// Handle a non-success status returned for a registry operation
    pub fn handle_registry_error(
        status: StatusCode,
        error_text: &str,
        operation: &str,
    ) -> RegistryError {
        let error_text = error_text.trim();
        let error_msg = match status.as_u16() {
            401 => format!(
                "Unauthorized to perform {} operation: {}",
                operation, error_text
            ),
            403 => format!(
                "Forbidden: insufficient permissions for {}: {}",
                operation, error_text
            ),
            404 => format!("Resource not found for {}: {}", operation, error_text),
            405 => format!(
                "Operation {} not allowed by registry (is deletion enabled?): {}",
                operation, error_text
            ),
            429 => format!("Rate limited during {}: {}", operation, error_text),
            500 => format!("Registry server error during {}: {}", operation, error_text),
            502 | 503 => format!("Registry unavailable for {}: {}", operation, error_text),
            _ => format!("{} failed (status {}): {}", operation, status, error_text),
        };

        RegistryError::Network(error_msg)
    }
}

/// Network error categorization
pub struct NetworkErrorHandler;

impl NetworkErrorHandler {
    /// Categorize and format transport errors with the operation they interrupted
    pub fn handle_network_error(error: &reqwest::Error, context: &str) -> RegistryError {
        let text = error.to_string();
        if error.is_timeout() {
            RegistryError::Network(format!("{} timeout: {}", context, error))
        } else if error.is_connect() {
            RegistryError::Network(format!("Connection error during {}: {}", context, error))
        } else if text.contains("dns") {
            RegistryError::Network(format!("DNS resolution error for {}: {}", context, error))
        } else if text.contains("certificate") {
            RegistryError::Network(format!(
                "TLS certificate error during {}: {}",
                context, error
            ))
        } else {
            RegistryError::Network(format!("{} network error: {}", context, error))
        }
    }
}
