//! Application orchestration for driving the prompt form from a terminal.

use crate::client::{GenerationService, HttpGenerationClient, MockGenerationClient};
use crate::form::PromptForm;
use crate::models::{Config, HealthStatus, HistoryEntry};
use crate::view::{self, RenderedView};
use crate::Result;
use std::fs;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::info;

const QUIT_COMMAND: &str = ":q";

/// Owns one form instance and the backend it talks to.
pub struct App {
    service: Box<dyn GenerationService>,
    form: PromptForm,
}

impl App {
    /// Build an app around an injected service.
    ///
    /// Integration tests use this to swap in [`MockGenerationClient`].
    pub fn with_services(service: Box<dyn GenerationService>) -> Self {
        Self {
            service,
            form: PromptForm::new(),
        }
    }

    pub fn new(config: &Config) -> Result<Self> {
        let service: Box<dyn GenerationService> = if config.dry_run {
            info!("DRY_RUN enabled, using mock generation backend");
            Box::new(MockGenerationClient::new())
        } else {
            info!("Generation backend: {}", config.api_base_url);
            Box::new(HttpGenerationClient::from_config(config)?)
        };

        Ok(Self::with_services(service))
    }

    pub fn form(&self) -> &PromptForm {
        &self.form
    }

    pub fn view(&self) -> RenderedView {
        view::render(&self.form)
    }

    /// Replace the prompt, trigger once, and return the resulting view.
    pub async fn generate(&mut self, prompt: &str) -> RenderedView {
        self.form.on_prompt_change(prompt);
        self.trigger().await
    }

    async fn trigger(&mut self) -> RenderedView {
        self.form.on_generate_triggered(self.service.as_ref()).await;
        self.view()
    }

    pub fn write_html(&self, path: &Path) -> Result<()> {
        fs::write(path, self.view().to_html())?;
        info!("Wrote rendered form to {}", path.display());
        Ok(())
    }

    /// Line-oriented session: each line replaces the prompt and triggers,
    /// an empty line re-triggers with the current prompt, `:q` quits.
    pub async fn run_interactive<R, W>(&mut self, input: R, mut output: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut lines = input.lines();
        output.write_all(b"prompt> ").await?;
        output.flush().await?;

        while let Some(line) = lines.next_line().await? {
            if line.trim() == QUIT_COMMAND {
                break;
            }
            if !line.is_empty() {
                self.form.on_prompt_change(line);
            }

            let rendered = self.trigger().await;
            output
                .write_all(format!("{}\nprompt> ", summarize(&rendered)).as_bytes())
                .await?;
            output.flush().await?;
        }

        output.write_all(b"\n").await?;
        output.flush().await?;
        Ok(())
    }

    pub async fn history(&self) -> Result<Vec<HistoryEntry>> {
        self.service.history().await
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        self.service.health().await
    }
}

/// One-line description of a rendered form for terminal output.
pub fn summarize(view: &RenderedView) -> String {
    match (&view.error, &view.image_src) {
        (Some(error), _) => format!("error: {}", error),
        (None, Some(src)) => format!("image: {}", src),
        (None, None) => "no image".to_string(),
    }
}
