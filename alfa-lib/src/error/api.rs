//! Failures of calls to the console API

use std::time::Duration;

/// Shown when the server cannot be reached at all.
pub const CONNECTION_ERROR_MESSAGE: &str =
    "No se puede conectar con el servidor. Verifique que la API esté funcionando.";

/// Shown when nothing better is known about a failure.
pub const UNKNOWN_ERROR_MESSAGE: &str = "Ha ocurrido un error desconocido";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status.
    #[error("server returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("bad endpoint URL: {0}")]
    InvalidUrl(String),

    /// A 2xx body that does not match the expected shape.
    #[error("unexpected response body: {message}")]
    Parse {
        message: String,
        body: Option<String>,
    },
}

impl ApiError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    /// Builds an HTTP error from a failed response.
    ///
    /// The message is the body's `error` field, else its `message` field,
    /// else a description of the status.
    pub fn from_response(status: u16, reason: Option<&str>, body: &str) -> Self {
        let json = serde_json::from_str::<serde_json::Value>(body).ok();
        let field = |name: &str| {
            json.as_ref()
                .and_then(|v| v.get(name))
                .and_then(|v| v.as_str())
                .filter(|s| !s.is_empty())
                .map(String::from)
        };

        let message = field("error")
            .or_else(|| field("message"))
            .unwrap_or_else(|| match reason {
                Some(reason) => format!("Código de error: {}, mensaje: {}", status, reason),
                None => UNKNOWN_ERROR_MESSAGE.to_string(),
            });

        Self::http(status, message)
    }

    /// A [`ApiError::Parse`] keeping the offending body for the logs.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the server was never reached.
    pub fn is_connection_failure(&self) -> bool {
        match self {
            Self::Network(e) => e.is_connect(),
            Self::Timeout(_) => true,
            _ => false,
        }
    }

    /// The message shown to the console user.
    pub fn user_message(&self) -> String {
        if self.is_connection_failure() {
            return CONNECTION_ERROR_MESSAGE.to_string();
        }
        match self {
            Self::Http { message, .. } => message.clone(),
            Self::Network(e) => format!("Error del cliente: {}", e),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_field_wins() {
        let err = ApiError::from_response(
            400,
            Some("Bad Request"),
            r#"{"success": false, "message": "Datos inválidos", "error": "El nombre es obligatorio"}"#,
        );
        assert_eq!(err.status_code(), Some(400));
        assert_eq!(err.user_message(), "El nombre es obligatorio");
    }

    #[test]
    fn test_message_field_fallback() {
        let err = ApiError::from_response(404, Some("Not Found"), r#"{"message": "Aseguradora no encontrada"}"#);
        assert_eq!(err.user_message(), "Aseguradora no encontrada");
    }

    #[test]
    fn test_status_fallback() {
        let err = ApiError::from_response(502, Some("Bad Gateway"), "<html>upstream down</html>");
        assert_eq!(err.user_message(), "Código de error: 502, mensaje: Bad Gateway");

        let err = ApiError::from_response(599, None, "");
        assert_eq!(err.user_message(), UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn test_timeout_is_connection_failure() {
        let err = ApiError::Timeout(Duration::from_secs(5));
        assert_eq!(err.user_message(), CONNECTION_ERROR_MESSAGE);
    }
}
