//! Flattens the workflow webhook's free-form JSON into one reply shape.
//!
//! The webhook may answer with plain text under a handful of field names,
//! or with a generated text file embedded somewhere in the body. The file
//! search is deliberately lenient about where the file sits; the lookup
//! order below is fixed and the first hit wins.

use serde::Deserialize;
use serde_json::Value;
use shared::chat_api::GeneratedFile;

/// Filename the webhook uses for generated artifacts.
pub const GENERATED_FILE_NAME: &str = "file.text";

/// Display text used when a reply carries a generated file.
pub const GENERATED_FILE_NOTICE: &str = "A file has been generated and is ready to download.";

/// Display text when the webhook answered without any recognizable content.
const DEFAULT_ACKNOWLEDGEMENT: &str = "Your request was processed successfully.";

/// One reply, whichever backend produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedReply {
    pub text: String,
    pub file: Option<GeneratedFile>,
}

impl NormalizedReply {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            file: None,
        }
    }
}

/// Normalize a workflow response body.
///
/// File lookup order:
/// 1. a top-level `file` object carrying `name` and non-empty `content`
/// 2. a top-level `files` array, matched by the reserved filename
/// 3. a shallow scan of remaining top-level object fields, same match
///
/// Without a file, the display text falls back through `output`,
/// `response`, `message`, then a fixed acknowledgement.
pub fn normalize_workflow_reply(value: &Value) -> NormalizedReply {
    if let Some(file) = find_generated_file(value) {
        return NormalizedReply {
            text: GENERATED_FILE_NOTICE.to_string(),
            file: Some(file),
        };
    }

    let text = ["output", "response", "message"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))
        .unwrap_or(DEFAULT_ACKNOWLEDGEMENT)
        .to_string();

    NormalizedReply { text, file: None }
}

fn find_generated_file(value: &Value) -> Option<GeneratedFile> {
    if let Some(file) = value.get("file").and_then(file_from_value) {
        return Some(file);
    }

    if let Some(entries) = value.get("files").and_then(Value::as_array) {
        if let Some(file) = entries
            .iter()
            .filter_map(file_from_value)
            .find(|f| f.name == GENERATED_FILE_NAME)
        {
            return Some(file);
        }
    }

    let map = value.as_object()?;
    map.values()
        .filter(|v| v.is_object())
        .filter_map(file_from_value)
        .find(|f| f.name == GENERATED_FILE_NAME)
}

/// Minimum shape a value must decode to before it counts as a file.
/// Extra fields are ignored; a wrong type anywhere means no match.
#[derive(Debug, Deserialize)]
struct FileStanza {
    name: String,
    content: String,
}

/// Empty content does not count as a file.
fn file_from_value(value: &Value) -> Option<GeneratedFile> {
    let stanza = FileStanza::deserialize(value).ok()?;
    if stanza.content.is_empty() {
        return None;
    }
    Some(GeneratedFile::text(stanza.name, stanza.content))
}
