//! Shared library for the calendar skill Lambda.
//!
//! This crate provides the Alexa envelope models, configuration, errors and the
//! Google Calendar client used by the skill.

pub mod auth;
pub mod calendar;
pub mod config;
pub mod credentials;
pub mod error;
pub mod event;
pub mod models;

pub use auth::{exchange_assertion, sign_assertion, AccessToken, AssertionClaims};
pub use calendar::{CalendarEvent, CalendarService, CreatedEvent, EventDateTime, GoogleCalendarClient};
pub use config::{Config, SKILL_TIME_ZONE};
pub use credentials::{load_service_account, ServiceAccountKey};
pub use error::{Error, Result};
pub use event::{resolve_year, EventDraft};
pub use models::{Intent, Request, RequestEnvelope, ResponseBuilder, ResponseEnvelope, Slot};
