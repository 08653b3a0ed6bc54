//! The Slack incoming-webhook payload and the client that delivers it.

use async_trait::async_trait;
use http::StatusCode;
use serde::Serialize;

use crate::notification::message::{RenderedNotification, SeverityColor};

/// Body of the webhook POST, shaped for the legacy incoming-webhook
/// attachment API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlackMessage {
    pub attachments: Vec<Attachment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attachment {
    pub fallback: String,
    pub color: SeverityColor,
    pub fields: Vec<AttachmentField>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentField {
    pub value: String,
    pub short: bool,
}

impl From<RenderedNotification> for SlackMessage {
    /// A single attachment carrying the rendered text both as the fallback
    /// line and as its one full-width field.
    fn from(notification: RenderedNotification) -> Self {
        SlackMessage {
            attachments: vec![Attachment {
                fallback: notification.text.clone(),
                color: notification.color,
                fields: vec![AttachmentField {
                    value: notification.text,
                    short: false,
                }],
            }],
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("webhook responded with status code: {0}")]
    UnexpectedStatus(StatusCode),
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Delivery side of the pipeline. Mocked in handler and dispatcher tests.
#[async_trait]
pub trait SlackWebhook: Send + Sync {
    async fn post_message(&self, message: &SlackMessage) -> Result<(), WebhookError>;
}

/// Posts messages to a Slack incoming webhook over HTTPS, one request per
/// message, no retries.
pub struct SlackWebhookClient {
    webhook_url: String,
}

impl SlackWebhookClient {
    pub fn new(webhook_url: String) -> Self {
        Self { webhook_url }
    }
}

#[async_trait]
impl SlackWebhook for SlackWebhookClient {
    async fn post_message(&self, message: &SlackMessage) -> Result<(), WebhookError> {
        let response = reqwest::Client::new()
            .post(&self.webhook_url)
            .json(message)
            .send()
            .await?;

        // The webhook treats anything but a plain 200 as a failed delivery.
        if response.status() != StatusCode::OK {
            return Err(WebhookError::UnexpectedStatus(response.status()));
        }

        Ok(())
    }
}
