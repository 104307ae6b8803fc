use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize)]
pub struct InviteEvent {
    pub title: String,
    pub date: NaiveDate,
}

/// Everything the outbound message needs: recipient contact, the bearer
/// token, the ready-made survey link, and the events being asked about.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyInvite {
    pub recipient_email: String,
    pub recipient_name: String,
    pub token: String,
    pub survey_url: String,
    pub events: Vec<InviteEvent>,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("Dispatch rejected with status {0}")]
    Rejected(reqwest::StatusCode),
}

/// Best-effort outbound dispatch. Callers log failures and move on; a failed
/// send never invalidates the survey request it belongs to.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_survey_invite(&self, invite: &SurveyInvite) -> Result<(), NotifyError>;
}

/// Posts invites as JSON to a configured webhook (e.g. a mail-sending
/// function), optionally authenticated with a bearer token.
pub struct WebhookNotifier {
    client: reqwest::Client,
    endpoint: String,
    bearer_token: Option<String>,
}

impl WebhookNotifier {
    pub fn new(endpoint: String, bearer_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            bearer_token,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    async fn send_survey_invite(&self, invite: &SurveyInvite) -> Result<(), NotifyError> {
        let mut request = self.client.post(&self.endpoint).json(invite);
        if let Some(token) = &self.bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(NotifyError::Rejected(response.status()));
        }
        Ok(())
    }
}

/// Used when no dispatch endpoint is configured; invites are only logged.
pub struct NoopNotifier;

#[async_trait]
impl Notifier for NoopNotifier {
    async fn send_survey_invite(&self, invite: &SurveyInvite) -> Result<(), NotifyError> {
        tracing::info!(
            recipient = %invite.recipient_email,
            events = invite.events.len(),
            "Survey invite not dispatched (no endpoint configured)"
        );
        Ok(())
    }
}
