//! Prompt form component state
//!
//! Holds the prompt being edited and the image reference currently shown.
//! A trigger issues one generation request; when several overlap, only the
//! outcome of the most recently issued request is applied.

use crate::client::GenerationService;
use crate::models::GenerationResponse;
use crate::Result;
use tracing::{error, info, warn};

pub type RequestId = u64;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum GenerationStatus {
    #[default]
    Idle,
    Pending {
        request_id: RequestId,
    },
    Failed {
        message: String,
    },
}

/// Snapshot of one trigger activation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationTicket {
    request_id: RequestId,
    prompt: String,
}

impl GenerationTicket {
    pub fn request_id(&self) -> RequestId {
        self.request_id
    }

    /// Prompt as it was when the trigger fired.
    pub fn prompt(&self) -> &str {
        &self.prompt
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer request was issued; the outcome was dropped.
    Stale,
}

#[derive(Debug, Default)]
pub struct PromptForm {
    prompt: String,
    image: Option<String>,
    status: GenerationStatus,
    latest_request: RequestId,
}

impl PromptForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn image_reference(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn status(&self) -> &GenerationStatus {
        &self.status
    }

    pub fn on_prompt_change(&mut self, text: impl Into<String>) {
        self.prompt = text.into();
    }

    pub fn begin_generation(&mut self) -> GenerationTicket {
        self.latest_request += 1;
        self.status = GenerationStatus::Pending {
            request_id: self.latest_request,
        };

        GenerationTicket {
            request_id: self.latest_request,
            prompt: self.prompt.clone(),
        }
    }

    pub fn complete_generation(
        &mut self,
        ticket: &GenerationTicket,
        outcome: Result<GenerationResponse>,
    ) -> Completion {
        if ticket.request_id != self.latest_request {
            warn!(
                request_id = ticket.request_id,
                latest = self.latest_request,
                "Discarding outcome of superseded generation request"
            );
            return Completion::Stale;
        }

        match outcome {
            Ok(response) => {
                self.image = response.into_image_reference();
                self.status = GenerationStatus::Idle;
                match &self.image {
                    Some(url) => info!(request_id = ticket.request_id, "Image ready: {}", url),
                    None => warn!(
                        request_id = ticket.request_id,
                        "Generation finished without an image reference"
                    ),
                }
            }
            Err(e) => {
                error!(request_id = ticket.request_id, "Generation failed: {}", e);
                self.status = GenerationStatus::Failed {
                    message: e.to_string(),
                };
            }
        }

        Completion::Applied
    }

    /// Issue a request for the current prompt and apply its outcome.
    pub async fn on_generate_triggered(&mut self, service: &dyn GenerationService) -> Completion {
        let ticket = self.begin_generation();
        let outcome = service.generate(ticket.prompt()).await;
        self.complete_generation(&ticket, outcome)
    }
}
