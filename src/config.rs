use serde::{Deserialize, Serialize};

/// Application configuration, loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub ocr: OcrConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// HS256 signing secret. Never logged.
    #[serde(skip_serializing)]
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
}

// The config is logged at startup; keep the secret out of it.
impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expiry_hours", &self.jwt_expiry_hours)
            .finish()
    }
}

/// Which vision engine backs the OCR endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OcrEngineKind {
    Openai,
    Mock,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    pub engine: OcrEngineKind,
    #[serde(skip_serializing)]
    pub api_key: String,
    pub api_base: String,
    pub model: String,
    /// Prompt language: "es", "en" or "pt".
    pub prompt_language: String,
    pub temperature: f32,
    /// Default confidence gate when the request does not supply one.
    pub confidence_threshold: f64,
}

impl std::fmt::Debug for OcrConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OcrConfig")
            .field("engine", &self.engine)
            .field("api_key", &"<redacted>")
            .field("api_base", &self.api_base)
            .field("model", &self.model)
            .field("prompt_language", &self.prompt_language)
            .field("temperature", &self.temperature)
            .field("confidence_threshold", &self.confidence_threshold)
            .finish()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgres://localhost/factura_backend".to_string()),
            },
            auth: AuthConfig {
                jwt_secret: "dev-secret".to_string(),
                jwt_expiry_hours: 24,
            },
            ocr: OcrConfig {
                engine: OcrEngineKind::Mock,
                api_key: String::new(),
                api_base: "https://api.openai.com/v1".to_string(),
                model: "gpt-4o".to_string(),
                prompt_language: "es".to_string(),
                temperature: 0.0,
                confidence_threshold: 95.0,
            },
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables, falling back to
    /// development defaults. An `OPENAI_API_KEY` switches the OCR engine to
    /// the real backend unless `OCR_ENGINE` says otherwise.
    pub fn from_env() -> Self {
        let api_key = std::env::var("OPENAI_API_KEY").unwrap_or_default();

        let engine = match std::env::var("OCR_ENGINE").as_deref() {
            Ok("openai") => OcrEngineKind::Openai,
            Ok("mock") => OcrEngineKind::Mock,
            _ if !api_key.is_empty() => OcrEngineKind::Openai,
            _ => OcrEngineKind::Mock,
        };

        Self {
            server: ServerConfig {
                host: std::env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
                port: std::env::var("SERVER_PORT")
                    .ok()
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(8080),
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .unwrap_or_else(|_| "postgres://localhost/factura_backend".to_string()),
            },
            auth: AuthConfig {
                jwt_secret: std::env::var("JWT_SECRET")
                    .unwrap_or_else(|_| "dev-secret".to_string()),
                jwt_expiry_hours: std::env::var("JWT_EXPIRY_HOURS")
                    .ok()
                    .and_then(|h| h.parse().ok())
                    .unwrap_or(24),
            },
            ocr: OcrConfig {
                engine,
                api_key,
                api_base: std::env::var("OCR_API_BASE")
                    .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
                model: std::env::var("OCR_MODEL").unwrap_or_else(|_| "gpt-4o".to_string()),
                prompt_language: std::env::var("OCR_PROMPT_LANGUAGE")
                    .unwrap_or_else(|_| "es".to_string()),
                temperature: std::env::var("OCR_TEMPERATURE")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(0.0),
                confidence_threshold: std::env::var("OCR_CONFIDENCE_THRESHOLD")
                    .ok()
                    .and_then(|t| t.parse().ok())
                    .unwrap_or(95.0),
            },
        }
    }
}
