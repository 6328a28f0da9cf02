//! Rendering of the prompt form
//!
//! [`render`] turns form state into a [`RenderedView`]; [`RenderedView::to_html`]
//! produces the markup served to a browser or written to disk.

use crate::form::{GenerationStatus, PromptForm};

pub const TITLE: &str = "AI Image Generator";
pub const PLACEHOLDER: &str = "Enter your prompt...";
pub const TRIGGER_LABEL: &str = "Generate";
pub const IMAGE_ALT: &str = "AI Result";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedView {
    pub input_value: String,
    pub trigger_label: &'static str,
    /// `src` of the result image; `None` means no image element at all.
    pub image_src: Option<String>,
    pub pending: bool,
    pub error: Option<String>,
}

pub fn render(form: &PromptForm) -> RenderedView {
    let (pending, error) = match form.status() {
        GenerationStatus::Idle => (false, None),
        GenerationStatus::Pending { .. } => (true, None),
        GenerationStatus::Failed { message } => (false, Some(message.clone())),
    };

    RenderedView {
        input_value: form.prompt().to_string(),
        trigger_label: TRIGGER_LABEL,
        image_src: form
            .image_reference()
            .filter(|src| !src.is_empty())
            .map(str::to_string),
        pending,
        error,
    }
}

impl RenderedView {
    pub fn to_html(&self) -> String {
        let mut html = String::from("<div>\n");
        html.push_str(&format!("  <h1>{}</h1>\n", TITLE));
        html.push_str(&format!(
            "  <input type=\"text\" value=\"{}\" placeholder=\"{}\"/>\n",
            escape_html(&self.input_value),
            PLACEHOLDER
        ));
        html.push_str(&format!("  <button>{}</button>\n", self.trigger_label));
        if self.pending {
            html.push_str("  <p class=\"pending\">Generating...</p>\n");
        }
        if let Some(error) = &self.error {
            html.push_str(&format!(
                "  <p class=\"error\">{}</p>\n",
                escape_html(error)
            ));
        }
        if let Some(src) = &self.image_src {
            html.push_str(&format!(
                "  <img src=\"{}\" alt=\"{}\"/>\n",
                escape_html(src),
                IMAGE_ALT
            ));
        }
        html.push_str("</div>\n");
        html
    }
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
