//! Google Calendar client for inserting events.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::future::Future;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::auth::{exchange_assertion, AccessToken};
use crate::credentials::load_service_account;
use crate::{Config, Error, Result};

/// Cached tokens are refreshed this long before they expire.
const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

/// Event payload sent to the calendar API.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CalendarEvent {
    pub summary: String,
    pub start: EventDateTime,
    pub end: EventDateTime,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDateTime {
    /// RFC 3339 timestamp with offset
    pub date_time: String,
    /// IANA zone name
    pub time_zone: String,
}

/// The calendar's record of an inserted event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedEvent {
    pub id: String,
    pub status: Option<String>,
    pub html_link: Option<String>,
}

/// A calendar that accepts new events.
pub trait CalendarService {
    /// Insert one event, returning the calendar's record of it.
    fn insert_event(
        &self,
        event: &CalendarEvent,
    ) -> impl Future<Output = Result<CreatedEvent>> + Send;
}

/// Google Calendar API v3 client authenticated as a service account.
pub struct GoogleCalendarClient {
    http_client: reqwest::Client,
    credentials_file: String,
    calendar_id: String,
    api_base: String,
    token: RwLock<Option<AccessToken>>,
}

impl GoogleCalendarClient {
    /// Create a client for the configured calendar.
    pub fn new(config: &Config) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;

        Ok(Self {
            http_client,
            credentials_file: config.credentials_file.clone(),
            calendar_id: config.calendar_id.clone(),
            api_base: config.calendar_api_base.clone(),
            token: RwLock::new(None),
        })
    }

    /// Return a valid access token, exchanging a new assertion when needed.
    async fn access_token(&self) -> Result<String> {
        let margin = Duration::seconds(TOKEN_REFRESH_MARGIN_SECS);

        {
            let cached = self.token.read().await;
            if let Some(token) = cached.as_ref().filter(|t| t.is_valid_at(Utc::now(), margin)) {
                return Ok(token.token.clone());
            }
        }

        let key = load_service_account(&self.credentials_file).await?;
        debug!(client_email = %key.client_email, "Exchanging service account assertion");
        let token = exchange_assertion(&self.http_client, &key, Utc::now()).await?;

        let value = token.token.clone();
        *self.token.write().await = Some(token);
        Ok(value)
    }

    fn events_url(&self) -> String {
        format!(
            "{}/calendars/{}/events",
            self.api_base,
            urlencoding::encode(&self.calendar_id)
        )
    }
}

impl CalendarService for GoogleCalendarClient {
    async fn insert_event(&self, event: &CalendarEvent) -> Result<CreatedEvent> {
        let access_token = self.access_token().await?;

        let response = self
            .http_client
            .post(self.events_url())
            .bearer_auth(access_token)
            .json(event)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::Calendar(format!(
                "Insert rejected ({}): {}",
                status, error_text
            )));
        }

        let created: CreatedEvent = response
            .json()
            .await
            .map_err(|e| Error::Calendar(format!("Failed to parse created event: {}", e)))?;

        info!(event_id = %created.id, calendar_id = %self.calendar_id, "Calendar event inserted");
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const PRIVATE_KEY: &str = include_str!("../testdata/service_account_key.pem");

    fn write_credentials(token_uri: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        let json = serde_json::json!({
            "type": "service_account",
            "client_email": "skill@skill-project.iam.gserviceaccount.com",
            "private_key": PRIVATE_KEY,
            "private_key_id": "key-1",
            "token_uri": token_uri,
        });
        file.write_all(json.to_string().as_bytes()).unwrap();
        file
    }

    fn test_config(server: &MockServer, credentials: &tempfile::NamedTempFile) -> Config {
        Config {
            credentials_file: credentials.path().to_str().unwrap().to_string(),
            calendar_id: "team@group.calendar.google.com".to_string(),
            calendar_api_base: server.uri(),
            http_timeout: std::time::Duration::from_secs(5),
        }
    }

    fn standup() -> CalendarEvent {
        CalendarEvent {
            summary: "Standup".to_string(),
            start: EventDateTime {
                date_time: "2026-01-15T10:00:00.000-03:00".to_string(),
                time_zone: "America/Sao_Paulo".to_string(),
            },
            end: EventDateTime {
                date_time: "2026-01-15T11:00:00.000-03:00".to_string(),
                time_zone: "America/Sao_Paulo".to_string(),
            },
        }
    }

    async fn mount_token(server: &MockServer, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "ya29.test",
                "expires_in": 3599
            })))
            .expect(expected_calls)
            .mount(server)
            .await;
    }

    #[test]
    fn test_event_serialization() {
        let json = serde_json::to_value(standup()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "summary": "Standup",
                "start": {"dateTime": "2026-01-15T10:00:00.000-03:00", "timeZone": "America/Sao_Paulo"},
                "end": {"dateTime": "2026-01-15T11:00:00.000-03:00", "timeZone": "America/Sao_Paulo"}
            })
        );
    }

    #[tokio::test]
    async fn test_insert_event() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;
        Mock::given(method("POST"))
            .and(path("/calendars/team%40group.calendar.google.com/events"))
            .and(header("authorization", "Bearer ya29.test"))
            .and(body_json(serde_json::to_value(standup()).unwrap()))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "evt123",
                "status": "confirmed",
                "htmlLink": "https://www.google.com/calendar/event?eid=evt123"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let credentials = write_credentials(&format!("{}/token", server.uri()));
        let client = GoogleCalendarClient::new(&test_config(&server, &credentials)).unwrap();
        let created = client.insert_event(&standup()).await.unwrap();

        assert_eq!(created.id, "evt123");
        assert_eq!(created.status.as_deref(), Some("confirmed"));
    }

    #[tokio::test]
    async fn test_token_reused_across_inserts() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;
        Mock::given(method("POST"))
            .and(path("/calendars/team%40group.calendar.google.com/events"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "evt"})))
            .expect(2)
            .mount(&server)
            .await;

        let credentials = write_credentials(&format!("{}/token", server.uri()));
        let client = GoogleCalendarClient::new(&test_config(&server, &credentials)).unwrap();
        client.insert_event(&standup()).await.unwrap();
        client.insert_event(&standup()).await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_rejected() {
        let server = MockServer::start().await;
        mount_token(&server, 1).await;
        Mock::given(method("POST"))
            .and(path("/calendars/team%40group.calendar.google.com/events"))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let credentials = write_credentials(&format!("{}/token", server.uri()));
        let client = GoogleCalendarClient::new(&test_config(&server, &credentials)).unwrap();
        let err = client.insert_event(&standup()).await.unwrap_err();

        assert!(matches!(err, Error::Calendar(msg) if msg.contains("403")));
    }

    #[tokio::test]
    async fn test_missing_credentials_file() {
        let server = MockServer::start().await;
        let config = Config {
            credentials_file: "/nonexistent/skill/credentials.json".to_string(),
            calendar_id: "primary".to_string(),
            calendar_api_base: server.uri(),
            http_timeout: std::time::Duration::from_secs(5),
        };

        let client = GoogleCalendarClient::new(&config).unwrap();
        let err = client.insert_event(&standup()).await.unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
