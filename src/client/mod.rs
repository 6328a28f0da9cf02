//! Generation backend integration
//!
//! Talks to the remote image-generation service over HTTP: submitting
//! prompts, listing past generations, and probing backend health.

pub mod http;
pub mod mock;

pub use http::HttpGenerationClient;
pub use mock::MockGenerationClient;

use crate::models::{GenerationResponse, HealthStatus, HistoryEntry};
use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Submit `prompt` and decode whatever image reference comes back.
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse>;
    async fn history(&self) -> Result<Vec<HistoryEntry>>;
    async fn health(&self) -> Result<HealthStatus>;
}
