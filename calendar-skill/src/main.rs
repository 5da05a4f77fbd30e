//! Calendar Skill Lambda - Handles Alexa voice interactions.
//!
//! Dispatches each Alexa request to a canned response and, for the
//! create-event intent, inserts a one-hour event into Google Calendar.

mod dispatcher;
mod handlers;
mod speech;

use chrono::Utc;
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use shared::{Config, GoogleCalendarClient, RequestEnvelope, ResponseEnvelope};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::dispatcher::SkillDispatcher;
use crate::handlers::HandlerInput;

/// Application state
struct AppState {
    dispatcher: SkillDispatcher,
    calendar: GoogleCalendarClient,
}

impl AppState {
    fn new() -> Result<Self, Error> {
        let config = Config::from_env()?;
        info!(calendar_id = %config.calendar_id, "Loaded skill configuration");

        Ok(Self {
            dispatcher: SkillDispatcher::new(),
            calendar: GoogleCalendarClient::new(&config)?,
        })
    }
}

async fn handler(
    state: Arc<AppState>,
    event: LambdaEvent<RequestEnvelope>,
) -> Result<ResponseEnvelope, Error> {
    let (envelope, context) = event.into_parts();
    let request = &envelope.request;

    info!(
        aws_request_id = %context.request_id,
        request_type = request.type_name(),
        intent = request.intent_name().unwrap_or(""),
        "Processing skill request"
    );

    let input = HandlerInput {
        request,
        calendar: &state.calendar,
        now: Utc::now(),
    };

    Ok(state.dispatcher.respond(&input).await)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let state = Arc::new(AppState::new()?);

    run(service_fn(move |event| {
        let state = Arc::clone(&state);
        async move { handler(state, event).await }
    }))
    .await
}
