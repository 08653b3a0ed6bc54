//! Turns the payload of an SNS record into the text and color shown in the
//! chat channel.
//!
//! Extraction is an ordered chain of parse attempts. The first attempt that
//! succeeds wins; whatever fails drops through to the next attempt and
//! ultimately to plain text. Nothing in this module returns an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::dtos::sns::SnsNotification;

/// Color bar of the chat attachment. Alerting red is the assumed state; a
/// subject announcing a recovery (`OK: ...`) turns it green.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeverityColor {
    #[serde(rename = "#00D000")]
    Recovered,
    #[serde(rename = "#D00000")]
    Alerting,
}

impl SeverityColor {
    pub fn from_subject(subject: &str) -> Self {
        if subject.contains("OK:") {
            SeverityColor::Recovered
        } else {
            SeverityColor::Alerting
        }
    }
}

/// A notification ready for delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedNotification {
    pub text: String,
    pub color: SeverityColor,
}

/// A CloudWatch alarm state transition, as published on alarm topics.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AlarmStateChange {
    #[serde(default)]
    pub new_state_value: Option<String>,
    #[serde(default)]
    pub old_state_value: Option<String>,
    #[serde(default)]
    pub new_state_reason: Option<String>,
}

impl AlarmStateChange {
    /// Recoveries out of INSUFFICIENT_DATA are false positives and must
    /// never reach the channel.
    pub fn is_noise(&self) -> bool {
        self.new_state_value.as_deref() == Some("OK")
            && self.old_state_value.as_deref() == Some("INSUFFICIENT_DATA")
    }
}

/// An RDS event notification. These arrive as flat JSON with spaced keys.
#[derive(Debug, Deserialize)]
pub struct DatabaseEvent {
    #[serde(rename = "Event Time")]
    pub event_time: String,
    #[serde(rename = "Event ID")]
    pub event_id: String,
    #[serde(rename = "Event Message")]
    pub event_message: String,
    #[serde(rename = "Source ID")]
    pub source_id: String,
}

impl DatabaseEvent {
    /// The short identifier embedded after the `#` of `Event ID`, e.g.
    /// `"...#RDS-EVENT-0002" -> "RDS-EVENT-0002"`. Empty when no `#` is
    /// present.
    fn short_id(&self) -> &str {
        self.event_id.split_once('#').map_or("", |(_, id)| id)
    }
}

/// Renders the structured alarm variant.
///
/// Returns `None` when the transition is suppressed. A message that does
/// not parse as an alarm state change, or parses without a reason, falls
/// back to the message itself as a pretty-printed JSON string.
pub fn render_alarm_notification(notification: &SnsNotification) -> Option<RenderedNotification> {
    let color = SeverityColor::from_subject(&notification.subject);

    let text = match serde_json::from_str::<AlarmStateChange>(&notification.message) {
        Ok(alarm) if alarm.is_noise() => return None,
        Ok(AlarmStateChange {
            new_state_reason: Some(reason),
            ..
        }) => format!("{}\nReason: {}", notification.subject, reason),
        Ok(_) => quoted_fallback(&notification.message),
        Err(error) => {
            tracing::info!(error = %error, "record body is not an alarm state change");
            quoted_fallback(&notification.message)
        }
    };

    Some(RenderedNotification { text, color })
}

/// Renders the plain-text database event variant. Never suppressed.
///
/// A message missing any of the four expected keys, or not valid JSON at
/// all, is forwarded verbatim.
pub fn render_database_event_notification(notification: &SnsNotification) -> RenderedNotification {
    let color = SeverityColor::from_subject(&notification.subject);

    let text = match serde_json::from_str::<DatabaseEvent>(&notification.message) {
        Ok(event) => format!(
            "{} - {}\n{} ({})",
            event.source_id,
            event.event_time,
            event.event_message,
            event.short_id()
        ),
        Err(error) => {
            tracing::info!(error = %error, "record body is not an RDS event notification");
            notification.message.clone()
        }
    };

    RenderedNotification { text, color }
}

fn quoted_fallback(message: &str) -> String {
    serde_json::to_string_pretty(&Value::String(message.to_owned()))
        .unwrap_or_else(|_| message.to_owned())
}
