//! The fixed set of backends the user can pick from.

use shared::chat_api::BackendId;

/// Identifier that routes to the workflow webhook instead of a model.
pub const WORKFLOW_ID: &str = "workflow";

pub struct BackendEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub const BACKENDS: &[BackendEntry] = &[
    BackendEntry {
        id: WORKFLOW_ID,
        name: "Workflow",
        description: "Automation webhook; can return generated files",
    },
    BackendEntry {
        id: "gpt-4",
        name: "GPT-4",
        description: "Most capable",
    },
    BackendEntry {
        id: "gpt-3.5-turbo",
        name: "GPT-3.5 Turbo",
        description: "Fast and efficient",
    },
    BackendEntry {
        id: "claude-3-opus",
        name: "Claude 3 Opus",
        description: "Strong at analysis",
    },
    BackendEntry {
        id: "claude-3-sonnet",
        name: "Claude 3 Sonnet",
        description: "Balanced and dependable",
    },
    BackendEntry {
        id: "claude-3-haiku",
        name: "Claude 3 Haiku",
        description: "Quick and concise",
    },
    BackendEntry {
        id: "gemini-pro",
        name: "Gemini Pro",
        description: "From Google",
    },
    BackendEntry {
        id: "llama-2-70b",
        name: "Llama 2 70B",
        description: "Open source",
    },
    BackendEntry {
        id: "mistral-large",
        name: "Mistral Large",
        description: "European flagship",
    },
    BackendEntry {
        id: "mixtral-8x7b",
        name: "Mixtral 8x7B",
        description: "Mixture of experts",
    },
    BackendEntry {
        id: "palm-2",
        name: "PaLM 2",
        description: "From Google",
    },
];

pub fn lookup(id: &str) -> Option<&'static BackendEntry> {
    BACKENDS.iter().find(|b| b.id == id)
}

/// Unknown identifiers pass through as completion model names.
pub fn resolve(id: &str) -> BackendId {
    if id == WORKFLOW_ID {
        BackendId::Workflow
    } else {
        BackendId::Completion {
            model: id.to_string(),
        }
    }
}

pub fn default_backend() -> BackendId {
    BackendId::Completion {
        model: "gpt-4".to_string(),
    }
}
