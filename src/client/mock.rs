use super::GenerationService;
use crate::models::{GenerationResponse, HealthStatus, HistoryEntry};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockGenerationClient {
    responses: Arc<Mutex<Vec<GenerationResponse>>>,
    history: Arc<Mutex<Vec<HistoryEntry>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    call_count: Arc<Mutex<usize>>,
    should_fail: Arc<Mutex<bool>>,
    base_url: String,
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            history: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
            call_count: Arc::new(Mutex::new(0)),
            should_fail: Arc::new(Mutex::new(false)),
            base_url: "https://mock-gen.example.com".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    pub fn with_response(self, response: GenerationResponse) -> Self {
        self.responses.lock().unwrap().push(response);
        self
    }

    pub fn with_history_entry(self, entry: HistoryEntry) -> Self {
        self.history.lock().unwrap().push(entry);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }

    /// Prompts received by `generate`, in call order.
    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationService for MockGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<GenerationResponse> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;
        self.prompts.lock().unwrap().push(prompt.to_string());

        if *self.should_fail.lock().unwrap() {
            return Err(Error::Api {
                status: 500,
                body: "Mock failure".to_string(),
            });
        }

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(GenerationResponse::Url(format!(
                "{}/media/generated/generated_{}.png",
                self.base_url, *count
            )))
        } else {
            let index = (*count - 1) % responses.len();
            Ok(responses[index].clone())
        }
    }

    async fn history(&self) -> Result<Vec<HistoryEntry>> {
        Ok(self.history.lock().unwrap().clone())
    }

    async fn health(&self) -> Result<HealthStatus> {
        Ok(HealthStatus {
            status: "healthy".to_string(),
            hugging_face_configured: false,
            local_model_enabled: false,
            available_endpoints: vec![
                "/api/generate/".to_string(),
                "/api/history/".to_string(),
                "/api/health/".to_string(),
            ],
        })
    }
}
