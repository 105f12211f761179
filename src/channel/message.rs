use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::config::runtime_config::RuntimeConfig;

/// Payload the developer submits for one element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct EditRequest {
    /// `relative/path:line:column`
    pub source_location: String,
    pub content: String,
    /// Lowercase tag name of the clicked element
    pub element: Option<String>,
}

/// Body of a response message after its `type` has been matched.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ResponseBody {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Messages the runtime reacts to from the embedding context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    Response { success: bool, error: Option<String> },
    /// `None` flips the current state
    Toggle { enabled: Option<bool> },
    Language { language: String },
}

/// `{ type: <request>, data: { sourceLocation, content, element } }`
pub fn request_message(config: &RuntimeConfig, request: &EditRequest) -> Value {
    json!({
        "type": config.message_type_data_request,
        "data": request,
    })
}

/// Detail of the same-context broadcast: the request fields themselves.
pub fn broadcast_detail(request: &EditRequest) -> Value {
    serde_json::to_value(request).unwrap_or(Value::Null)
}

pub fn response_message(config: &RuntimeConfig, success: bool, error: Option<&str>) -> Value {
    let mut message = json!({
        "type": config.message_type_data_response,
        "success": success,
    });
    if let Some(error) = error {
        message["error"] = Value::String(error.to_string());
    }
    message
}

pub fn toggle_message(config: &RuntimeConfig, enabled: Option<bool>) -> Value {
    let mut message = json!({ "type": config.message_type_toggle });
    if let Some(enabled) = enabled {
        message["enabled"] = Value::Bool(enabled);
    }
    message
}

pub fn language_message(config: &RuntimeConfig, language: &str) -> Value {
    json!({
        "type": config.message_type_language,
        "language": language,
    })
}

/// Match a raw message against the configured type tags.
///
/// Anything without a string `type`, or with an unknown one, is not ours and
/// yields `None`.
pub fn decode_inbound(message: &Value, config: &RuntimeConfig) -> Option<InboundMessage> {
    let kind = message.get("type")?.as_str()?;

    if kind == config.message_type_data_response {
        let body: ResponseBody = serde_json::from_value(message.clone()).unwrap_or(ResponseBody {
            success: false,
            error: None,
        });
        return Some(InboundMessage::Response {
            success: body.success,
            error: body.error,
        });
    }

    if kind == config.message_type_toggle {
        return Some(InboundMessage::Toggle {
            enabled: message.get("enabled").and_then(Value::as_bool),
        });
    }

    if kind == config.message_type_language {
        let language = message.get("language")?.as_str()?;
        if language.is_empty() {
            return None;
        }
        return Some(InboundMessage::Language {
            language: language.to_string(),
        });
    }

    None
}
