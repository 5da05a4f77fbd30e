//! Ordered dispatch of requests to handlers.

use shared::{CalendarService, Error, Request, ResponseEnvelope, Result};
use tracing::debug;

use crate::handlers::{ErrorHandler, HandlerInput, RequestHandler};

/// Request handlers in priority order; the first match wins.
const REGISTRATION_ORDER: [RequestHandler; 7] = [
    RequestHandler::Launch,
    RequestHandler::CreateEvent,
    RequestHandler::Help,
    RequestHandler::CancelOrStop,
    RequestHandler::Fallback,
    RequestHandler::SessionEnded,
    RequestHandler::IntentReflector,
];

/// Flat dispatch table with a catch-all error handler.
pub struct SkillDispatcher {
    request_handlers: Vec<RequestHandler>,
    error_handler: ErrorHandler,
}

impl Default for SkillDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl SkillDispatcher {
    pub fn new() -> Self {
        Self {
            request_handlers: REGISTRATION_ORDER.to_vec(),
            error_handler: ErrorHandler::CatchAll,
        }
    }

    /// First registered handler accepting the request.
    pub fn select(&self, request: &Request) -> Option<RequestHandler> {
        self.request_handlers
            .iter()
            .copied()
            .find(|handler| handler.can_handle(request))
    }

    /// Route the request to its handler without error recovery.
    pub async fn dispatch<C: CalendarService>(
        &self,
        input: &HandlerInput<'_, C>,
    ) -> Result<ResponseEnvelope> {
        let handler = self.select(input.request).ok_or_else(|| {
            Error::NoHandler(input.request.type_name().to_string())
        })?;

        debug!(?handler, "Selected handler");
        handler.handle(input).await
    }

    /// Route the request, converting any failure into the apology response.
    pub async fn respond<C: CalendarService>(&self, input: &HandlerInput<'_, C>) -> ResponseEnvelope {
        match self.dispatch(input).await {
            Ok(response) => response,
            Err(e) => self.error_handler.handle(input.request, &e),
        }
    }
}
