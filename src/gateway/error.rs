//! Error channel for the gateway.
//!
//! Transport failures and application failures travel through the same
//! error type. Views display the message; they only look at the status
//! when they need to distinguish, e.g., a rejected credential.

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GatewayError {
    /// The backend answered with a non-success status. Carries the
    /// backend-supplied `message` unchanged.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// The request never produced a usable response (connection refused,
    /// timeout, DNS failure).
    #[error("Não foi possível conectar ao servidor: {0}")]
    Transport(#[from] reqwest::Error),

    /// A success response that did not match the expected shape.
    #[error("Resposta inesperada do servidor: {0}")]
    Decode(#[from] serde_json::Error),
}

impl GatewayError {
    /// The HTTP status for application failures, if this is one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the backend rejected the bearer credential.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }
}

/// Error envelope the backend uses for every failure.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display_is_backend_message() {
        let err = GatewayError::Api {
            status: 401,
            message: "Credenciais inválidas!".to_string(),
        };
        assert_eq!(err.to_string(), "Credenciais inválidas!");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_error_body_tolerates_missing_message() {
        let body: ErrorBody = serde_json::from_str("{}").unwrap();
        assert!(body.message.is_none());
    }
}
