//! Agent and login payloads

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// An authenticated brokerage agent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: i64,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "correo")]
    pub email: String,
    #[serde(rename = "usuario")]
    pub username: String,
    #[serde(rename = "rol")]
    pub role: String,
    #[serde(rename = "activo")]
    pub active: bool,
    /// Creation timestamp as sent by the server.
    #[serde(rename = "fecha_creacion")]
    pub created_at: String,
}

/// Login form contents.
#[derive(Clone, Serialize)]
pub struct Credentials {
    #[serde(rename = "usuario")]
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Payload of a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginData {
    #[serde(rename = "agente")]
    pub agent: Agent,
    pub token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}

/// The `{ success, message, data, error }` wrapper used by the auth API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
    #[serde(default)]
    pub error: Option<String>,
}

impl<T> ApiEnvelope<T> {
    /// Best description of a failed envelope.
    pub fn failure_message(&self) -> String {
        self.error
            .clone()
            .filter(|e| !e.is_empty())
            .unwrap_or_else(|| self.message.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_login_success() {
        let json = r#"{
            "success": true,
            "message": "Login exitoso",
            "data": {
                "agente": {
                    "id": 1,
                    "nombre": "Laura Gómez",
                    "correo": "laura@alfa.com",
                    "usuario": "lgomez",
                    "rol": "admin",
                    "activo": true,
                    "fecha_creacion": "2024-03-01T10:00:00Z"
                },
                "token": "jwt-token",
                "expires_in": 3600
            }
        }"#;
        let envelope: ApiEnvelope<LoginData> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        let data = envelope.data.unwrap();
        assert_eq!(data.agent.username, "lgomez");
        assert_eq!(data.expires_in, 3600);
    }

    #[test]
    fn test_deserialize_login_failure() {
        let json = r#"{"success": false, "message": "Error", "error": "Credenciales inválidas"}"#;
        let envelope: ApiEnvelope<LoginData> = serde_json::from_str(json).unwrap();
        assert!(!envelope.success);
        assert!(envelope.data.is_none());
        assert_eq!(envelope.failure_message(), "Credenciales inválidas");
    }

    #[test]
    fn test_credentials_hide_password() {
        let credentials = Credentials::new("lgomez", "secreto");
        assert!(!format!("{:?}", credentials).contains("secreto"));
        let json = serde_json::to_value(&credentials).unwrap();
        assert_eq!(json["usuario"], "lgomez");
        assert_eq!(json["password"], "secreto");
    }
}
