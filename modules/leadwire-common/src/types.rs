use chrono::Local;
use serde::{Deserialize, Serialize};

/// A candidate news item surfaced by the discovery stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lead {
    /// Summary text of the lead.
    pub text: String,
    /// Source URLs backing the lead, in discovery order.
    #[serde(default)]
    pub sources: Vec<String>,
    /// Human-readable discovery date, e.g. "06 August 2026".
    #[serde(default = "today_formatted")]
    pub date: String,
}

impl Lead {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            sources: Vec::new(),
            date: today_formatted(),
        }
    }

    pub fn with_sources(mut self, sources: Vec<String>) -> Self {
        self.sources = sources;
        self
    }
}

/// Today's date in the human-readable form used in prompts.
pub fn today_formatted() -> String {
    Local::now().format("%d %B %Y").to_string()
}
