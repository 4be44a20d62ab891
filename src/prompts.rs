use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Built-in world-building prompt, see `assets/bootstrap_prompt.txt`.
const BOOTSTRAP_PROMPT: &str = include_str!("../assets/bootstrap_prompt.txt");

/// Resource-listing URLs cited in the bootstrap prompt. The model is told
/// where to look; nothing here fetches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceUrls {
    pub objects: String,
    pub decorations: String,
    pub surfaces: String,
    pub locations: String,
}

impl ResourceUrls {
    pub fn from_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');
        Self {
            objects: format!("{origin}/api/objects/list"),
            decorations: format!("{origin}/api/decorations/list"),
            surfaces: format!("{origin}/api/surfaces/list"),
            locations: format!("{origin}/api/locations/list"),
        }
    }
}

/// Prompt text with `{objects}`, `{decorations}`, `{surfaces}` and
/// `{locations}` placeholders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::new(BOOTSTRAP_PROMPT)
    }
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Load a replacement template from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read prompt template {}", path.display()))?;
        Ok(Self::new(text))
    }

    /// Substitute resource URLs into the template
    pub fn render(&self, urls: &ResourceUrls) -> String {
        self.text
            .replace("{objects}", &urls.objects)
            .replace("{decorations}", &urls.decorations)
            .replace("{surfaces}", &urls.surfaces)
            .replace("{locations}", &urls.locations)
    }
}
