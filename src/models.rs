//! Data models and structures
//!
//! Defines the wire payloads exchanged with the generation backend, the
//! decoded shape of a generation response, and runtime configuration.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::time::Duration;
use uuid::Uuid;

/// Base address of the generation backend when nothing overrides it.
pub const DEFAULT_API_BASE_URL: &str = "http://127.0.0.1:8000";

pub const GENERATE_PATH: &str = "/api/generate/";
pub const HISTORY_PATH: &str = "/api/history/";
pub const HEALTH_PATH: &str = "/api/health/";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Request body for a generation call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerateRequest {
    pub prompt: String,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
        }
    }
}

/// Decoded generation response.
///
/// The backend answers either with an object carrying `url`, or with a list
/// whose first element carries `generated_image`. Every other body decodes to
/// [`GenerationResponse::Unrecognized`]. That includes empty strings in those
/// fields and non-string values such as `{"url": 7}`: only a string can be an
/// image `src`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "RawGenerationBody")]
pub enum GenerationResponse {
    Url(String),
    GeneratedImage(String),
    Unrecognized,
}

impl GenerationResponse {
    pub fn image_reference(&self) -> Option<&str> {
        match self {
            Self::Url(url) | Self::GeneratedImage(url) => Some(url),
            Self::Unrecognized => None,
        }
    }

    pub fn into_image_reference(self) -> Option<String> {
        match self {
            Self::Url(url) | Self::GeneratedImage(url) => Some(url),
            Self::Unrecognized => None,
        }
    }
}

/// Raw body shapes.
///
/// Variant order matters for `#[serde(untagged)]` decoding: derived structs
/// also accept sequences, so `Sequence` must be tried before `Object`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawGenerationBody {
    Sequence(Vec<Value>),
    Object(UrlBody),
    Other(Value),
}

#[derive(Debug, Deserialize)]
struct UrlBody {
    url: Option<Value>,
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl From<RawGenerationBody> for GenerationResponse {
    fn from(raw: RawGenerationBody) -> Self {
        match raw {
            RawGenerationBody::Object(body) => non_empty_str(body.url.as_ref())
                .map(Self::Url)
                .unwrap_or(Self::Unrecognized),
            RawGenerationBody::Sequence(items) => {
                non_empty_str(items.first().and_then(|item| item.get("generated_image")))
                    .map(Self::GeneratedImage)
                    .unwrap_or(Self::Unrecognized)
            }
            RawGenerationBody::Other(_) => Self::Unrecognized,
        }
    }
}

/// One past generation as listed by the backend history endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub prompt: String,
    #[serde(default)]
    pub style: String,
    pub image: Option<String>,
    pub image_url: Option<String>,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub timestamp: DateTime<Utc>,
    pub generation_time: Option<f64>,
    #[serde(default)]
    pub model_used: String,
}

/// Accepts RFC 3339 timestamps and, when the backend runs without timezone
/// support, naive ISO 8601 ones, which are read as UTC.
fn deserialize_timestamp<'de, D>(deserializer: D) -> std::result::Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    if let Ok(aware) = raw.parse::<DateTime<Utc>>() {
        return Ok(aware);
    }
    raw.parse::<NaiveDateTime>()
        .map(|naive| naive.and_utc())
        .map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{}': {}", raw, e)))
}

impl HistoryEntry {
    /// Best link to the stored image, preferring the absolute URL.
    pub fn image_location(&self) -> Option<&str> {
        self.image_url
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.image.as_deref().filter(|s| !s.is_empty()))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub hugging_face_configured: bool,
    #[serde(default)]
    pub local_model_enabled: bool,
    #[serde(default)]
    pub available_endpoints: Vec<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_base_url: String,
    pub timeout: Duration,
    pub dry_run: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            dry_run: false,
        }
    }
}

impl Config {
    pub fn from_env() -> crate::Result<Self> {
        check_env_file(dotenvy::dotenv())?;
        Self::from_vars(|key| std::env::var(key).ok())
    }

    fn from_vars<F>(lookup: F) -> crate::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let timeout_secs = match lookup("IMAGEGEN_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|_| {
                crate::Error::Config(format!("IMAGEGEN_TIMEOUT_SECS is not a number: {}", raw))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            api_base_url: lookup("IMAGEGEN_API_BASE_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            timeout: Duration::from_secs(timeout_secs),
            dry_run: lookup("DRY_RUN")
                .map(|v| matches!(v.to_ascii_lowercase().as_str(), "true" | "1"))
                .unwrap_or(false),
        })
    }
}

/// A missing `.env` is fine; one that exists but fails to parse is not.
fn check_env_file<T>(result: dotenvy::Result<T>) -> crate::Result<()> {
    match result {
        Ok(_) => Ok(()),
        Err(e) if e.not_found() => Ok(()),
        Err(e) => Err(e.into()),
    }
}
