//! The subset of the SNS fan-out envelope the notifiers care about.

use serde::Deserialize;
use serde_json::Value;

/// One inbound event. SNS wraps every delivery in a `Records` array; an
/// event without one carries nothing to forward.
#[derive(Debug, Default, Deserialize)]
pub struct NotificationEvent {
    #[serde(default, rename = "Records")]
    pub records: Vec<Value>,
}

impl NotificationEvent {
    /// Reads the event leniently: a malformed event degrades to an empty
    /// record list instead of failing the invocation.
    pub fn from_value(event: Value) -> Self {
        serde_json::from_value(event).unwrap_or_default()
    }
}

/// A single `Records` entry. Records can come from other sources than SNS,
/// in which case `Sns` is absent and the record is skipped.
#[derive(Debug, Deserialize)]
pub struct NotificationRecord {
    #[serde(rename = "Sns")]
    pub sns: Option<SnsNotification>,
}

/// The SNS payload of a record. Only `Subject` and `Message` matter here;
/// the delivery metadata SNS publishes alongside them is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnsNotification {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}
