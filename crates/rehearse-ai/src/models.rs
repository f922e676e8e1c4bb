//! Model registry: known chat and speech-to-text models per provider.

use crate::{Model, Provider};

/// Default chat model the candidate persona runs on
pub const DEFAULT_CHAT_MODEL: &str = "llama-3.3-70b-versatile";

/// Default speech-to-text model
pub const DEFAULT_STT_MODEL: &str = "whisper-large-v3-turbo";

struct ModelEntry {
    id: &'static str,
    provider: Provider,
}

const MODEL_ENTRIES: &[ModelEntry] = &[
    ModelEntry {
        id: "llama-3.3-70b-versatile",
        provider: Provider::Groq,
    },
    ModelEntry {
        id: "llama-3.1-8b-instant",
        provider: Provider::Groq,
    },
    ModelEntry {
        id: "whisper-large-v3-turbo",
        provider: Provider::Groq,
    },
    ModelEntry {
        id: "whisper-large-v3",
        provider: Provider::Groq,
    },
    ModelEntry {
        id: "gpt-4o-mini",
        provider: Provider::OpenAI,
    },
    ModelEntry {
        id: "gpt-4o",
        provider: Provider::OpenAI,
    },
    ModelEntry {
        id: "whisper-1",
        provider: Provider::OpenAI,
    },
];

/// Look up a registered model by provider and ID.
pub fn get_model(provider: Provider, id: &str) -> Option<Model> {
    MODEL_ENTRIES
        .iter()
        .find(|e| e.id == id && e.provider == provider)
        .map(|e| Model::new(e.provider, e.id))
}

/// Resolve a model ID, constructing an ad-hoc model for unknown IDs.
pub fn resolve_model(provider: Provider, id: &str) -> Model {
    get_model(provider, id).unwrap_or_else(|| {
        tracing::debug!(model = id, provider = provider.name(), "Unregistered model, using provider defaults");
        Model::new(provider, id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_registered_on_groq() {
        assert!(get_model(Provider::Groq, DEFAULT_CHAT_MODEL).is_some());
        assert!(get_model(Provider::Groq, DEFAULT_STT_MODEL).is_some());
    }

    #[test]
    fn test_get_model_requires_matching_provider() {
        assert!(get_model(Provider::OpenAI, DEFAULT_CHAT_MODEL).is_none());
    }

    #[test]
    fn test_resolve_unknown_model() {
        let model = resolve_model(Provider::Custom, "my-local-model");
        assert_eq!(model.id, "my-local-model");
        assert_eq!(model.base_url, Provider::Custom.default_base_url());
    }
}
