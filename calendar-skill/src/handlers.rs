//! Request handlers, one per recognized request shape.

use chrono::{DateTime, Utc};
use shared::{
    resolve_year, CalendarService, CreatedEvent, Error, EventDraft, Request, ResponseBuilder,
    ResponseEnvelope, Result,
};
use tracing::{error, info};

use crate::speech;

pub const CREATE_EVENT_INTENT: &str = "CreateEventIntent";
pub const HELP_INTENT: &str = "AMAZON.HelpIntent";
pub const CANCEL_INTENT: &str = "AMAZON.CancelIntent";
pub const STOP_INTENT: &str = "AMAZON.StopIntent";
pub const FALLBACK_INTENT: &str = "AMAZON.FallbackIntent";

/// Everything a handler sees for one invocation.
pub struct HandlerInput<'a, C> {
    pub request: &'a Request,
    pub calendar: &'a C,
    /// Invocation time, used to resolve the year of event dates
    pub now: DateTime<Utc>,
}

/// Handlers for recognized requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestHandler {
    Launch,
    CreateEvent,
    Help,
    CancelOrStop,
    Fallback,
    SessionEnded,
    /// Echoes the name of any intent not handled earlier
    IntentReflector,
}

impl RequestHandler {
    pub fn can_handle(&self, request: &Request) -> bool {
        match self {
            RequestHandler::Launch => matches!(request, Request::LaunchRequest { .. }),
            RequestHandler::CreateEvent => request.intent_name() == Some(CREATE_EVENT_INTENT),
            RequestHandler::Help => request.intent_name() == Some(HELP_INTENT),
            RequestHandler::CancelOrStop => {
                matches!(request.intent_name(), Some(CANCEL_INTENT) | Some(STOP_INTENT))
            }
            RequestHandler::Fallback => request.intent_name() == Some(FALLBACK_INTENT),
            RequestHandler::SessionEnded => {
                matches!(request, Request::SessionEndedRequest { .. })
            }
            RequestHandler::IntentReflector => request.intent().is_some(),
        }
    }

    pub async fn handle<C: CalendarService>(
        &self,
        input: &HandlerInput<'_, C>,
    ) -> Result<ResponseEnvelope> {
        let response = match self {
            RequestHandler::Launch => ResponseBuilder::new()
                .speak(speech::LAUNCH)
                .reprompt(speech::LAUNCH_REPROMPT)
                .build(),
            RequestHandler::CreateEvent => create_event(input).await,
            RequestHandler::Help => ResponseBuilder::new()
                .speak(speech::HELP)
                .reprompt(speech::HELP_REPROMPT)
                .build(),
            RequestHandler::CancelOrStop => ResponseBuilder::new().speak(speech::GOODBYE).build(),
            RequestHandler::Fallback => ResponseBuilder::new()
                .speak(speech::FALLBACK)
                .reprompt(speech::FALLBACK_REPROMPT)
                .build(),
            RequestHandler::SessionEnded => {
                if let Request::SessionEndedRequest { reason, .. } = input.request {
                    info!(reason = reason.as_deref().unwrap_or("unknown"), "Session ended");
                }
                ResponseBuilder::new().build()
            }
            RequestHandler::IntentReflector => {
                let intent_name = input.request.intent_name().ok_or_else(|| {
                    Error::Internal(format!(
                        "Intent reflector invoked for {}",
                        input.request.type_name()
                    ))
                })?;
                ResponseBuilder::new()
                    .speak(speech::intent_reflection(intent_name))
                    .build()
            }
        };

        Ok(response)
    }
}

/// Create the requested event, answering with a confirmation or an apology.
async fn create_event<C: CalendarService>(input: &HandlerInput<'_, C>) -> ResponseEnvelope {
    match insert_requested_event(input).await {
        Ok(created) => {
            info!(event_id = %created.id, "Event created");
            ResponseBuilder::new().speak(speech::EVENT_CREATED).build()
        }
        Err(e) => {
            error!(error = %e, kind = e.kind(), "Failed to create event");
            ResponseBuilder::new().speak(speech::EVENT_FAILED).build()
        }
    }
}

async fn insert_requested_event<C: CalendarService>(
    input: &HandlerInput<'_, C>,
) -> Result<CreatedEvent> {
    let intent = input
        .request
        .intent()
        .ok_or_else(|| Error::Internal("Create event invoked without an intent".to_string()))?;

    let draft = EventDraft::from_intent(intent)?;
    let event = draft.to_calendar_event(resolve_year(input.now))?;
    input.calendar.insert_event(&event).await
}

/// Error handlers, consulted when dispatch fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorHandler {
    /// Accepts every error and answers with a generic apology
    CatchAll,
}

impl ErrorHandler {
    pub fn handle(&self, request: &Request, error: &Error) -> ResponseEnvelope {
        match self {
            ErrorHandler::CatchAll => {
                error!(
                    error = %error,
                    kind = error.kind(),
                    request_type = request.type_name(),
                    "Unhandled error while processing request"
                );
                ResponseBuilder::new().speak(speech::GENERIC_ERROR).build()
            }
        }
    }
}
