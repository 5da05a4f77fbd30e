//! Alexa request and response envelope models.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Incoming Alexa request envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: Option<String>,
    pub session: Option<Value>,
    pub context: Option<Value>,
    pub request: Request,
}

/// Request body, tagged by its `type` field.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    LaunchRequest {
        #[serde(rename = "requestId", default)]
        request_id: Option<String>,
    },
    IntentRequest {
        #[serde(rename = "requestId", default)]
        request_id: Option<String>,
        intent: Intent,
    },
    SessionEndedRequest {
        #[serde(rename = "requestId", default)]
        request_id: Option<String>,
        reason: Option<String>,
    },
    /// Any request type the skill does not recognize
    #[serde(other)]
    Unknown,
}

impl Request {
    /// Request type name, for logging.
    pub fn type_name(&self) -> &'static str {
        match self {
            Request::LaunchRequest { .. } => "LaunchRequest",
            Request::IntentRequest { .. } => "IntentRequest",
            Request::SessionEndedRequest { .. } => "SessionEndedRequest",
            Request::Unknown => "Unknown",
        }
    }

    /// The intent, for intent requests.
    pub fn intent(&self) -> Option<&Intent> {
        match self {
            Request::IntentRequest { intent, .. } => Some(intent),
            _ => None,
        }
    }

    /// Name of the intent, for intent requests.
    pub fn intent_name(&self) -> Option<&str> {
        self.intent().map(|intent| intent.name.as_str())
    }
}

/// A recognized voice command with its slot values.
#[derive(Debug, Clone, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: HashMap<String, Slot>,
}

impl Intent {
    /// Value of the named slot, treating an absent slot and an absent value alike.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots.get(name).and_then(|slot| slot.value.as_deref())
    }
}

/// A named parameter extracted from the spoken request.
#[derive(Debug, Clone, Deserialize)]
pub struct Slot {
    #[serde(default)]
    pub name: Option<String>,
    pub value: Option<String>,
}

/// Outgoing Alexa response envelope.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ResponseEnvelope {
    pub version: String,
    pub response: ResponseBody,
}

impl ResponseEnvelope {
    /// Spoken text of the response, if any.
    pub fn speech_text(&self) -> Option<&str> {
        self.response
            .output_speech
            .as_ref()
            .map(|speech| speech.text.as_str())
    }

    /// Reprompt text of the response, if any.
    pub fn reprompt_text(&self) -> Option<&str> {
        self.response
            .reprompt
            .as_ref()
            .map(|reprompt| reprompt.output_speech.text.as_str())
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_speech: Option<OutputSpeech>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_end_session: Option<bool>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: String,
    pub text: String,
}

impl OutputSpeech {
    pub fn plain_text(text: impl Into<String>) -> Self {
        Self {
            speech_type: "PlainText".to_string(),
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// Fluent builder for [`ResponseEnvelope`].
///
/// A response with a reprompt keeps the session open, a response with
/// speech only ends it, and an empty response leaves `shouldEndSession`
/// unset unless it is set explicitly.
#[derive(Debug, Default)]
pub struct ResponseBuilder {
    speech: Option<String>,
    reprompt: Option<String>,
    should_end_session: Option<bool>,
}

impl ResponseBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn speak(mut self, text: impl Into<String>) -> Self {
        self.speech = Some(text.into());
        self
    }

    pub fn reprompt(mut self, text: impl Into<String>) -> Self {
        self.reprompt = Some(text.into());
        self
    }

    pub fn should_end_session(mut self, end: bool) -> Self {
        self.should_end_session = Some(end);
        self
    }

    pub fn build(self) -> ResponseEnvelope {
        let should_end_session = self.should_end_session.or_else(|| {
            if self.reprompt.is_some() {
                Some(false)
            } else if self.speech.is_some() {
                Some(true)
            } else {
                None
            }
        });

        ResponseEnvelope {
            version: "1.0".to_string(),
            response: ResponseBody {
                output_speech: self.speech.map(OutputSpeech::plain_text),
                reprompt: self.reprompt.map(|text| Reprompt {
                    output_speech: OutputSpeech::plain_text(text),
                }),
                should_end_session,
            },
        }
    }
}
