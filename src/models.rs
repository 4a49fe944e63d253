//! Static registry of the models selectable in the client.

/// One selectable model: OpenRouter id, human-readable name and the accent
/// color the front-end uses for its badge.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    pub id: String,
    pub display_name: String,
    pub accent_color: String,
}

/// Fixed, ordered model table loaded once at startup. The first entry is
/// the default selection; callers treat a failed [`resolve`] the same way.
///
/// [`resolve`]: ModelRegistry::resolve
pub struct ModelRegistry {
    models: Vec<ModelInfo>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        let models = [
            (
                "openai/gpt-4o-mini-search-preview",
                "OpenAI GPT-4o Mini Search Preview",
                "#2563eb",
            ),
            (
                "google/gemini-2.5-flash-lite-preview-06-17",
                "Google Gemini",
                "#ed8936",
            ),
            ("google/gemma-3n-e2b-it:free", "Google Gemma (free)", "#059669"),
            (
                "nvidia/nemotron-nano-9b-v2:free",
                "NVIDIA Nemotron Nano (free)",
                "#13b3b6",
            ),
            (
                "agentica-org/deepcoder-14b-preview:free",
                "Deepcoder (agentica, free)",
                "#b91c1c",
            ),
            (
                "mistralai/mistral-small-3.2-24b-instruct:free",
                "Mistral Small (free)",
                "#7c3aed",
            ),
            ("x-ai/grok-4-fast:free", "GROK (free)", "#ea580c"),
        ]
        .into_iter()
        .map(|(id, display_name, accent_color)| ModelInfo {
            id: id.to_string(),
            display_name: display_name.to_string(),
            accent_color: accent_color.to_string(),
        })
        .collect();

        Self { models }
    }

    /// All models in registration order.
    pub fn list(&self) -> &[ModelInfo] {
        &self.models
    }

    pub fn resolve(&self, id: &str) -> Option<&ModelInfo> {
        self.models.iter().find(|m| m.id == id)
    }

    /// The first registered model, the fallback for any unknown id.
    pub fn default_model(&self) -> &ModelInfo {
        &self.models[0]
    }
}

impl Default for ModelRegistry {
    fn default() -> Self {
        Self::new()
    }
}
