//! Builders for the SNS fan-out payloads the notifier tests feed in.

use serde_json::{json, Value};

/// An inbound event carrying a single SNS record.
pub fn sns_event(subject: &str, message: &str) -> Value {
    sns_event_with_records(vec![sns_record(subject, message)])
}

/// An inbound event carrying the given records verbatim.
pub fn sns_event_with_records(records: Vec<Value>) -> Value {
    json!({ "Records": records })
}

/// One `Records` entry with an `Sns` payload.
pub fn sns_record(subject: &str, message: &str) -> Value {
    json!({
        "EventSource": "aws:sns",
        "Sns": {
            "Subject": subject,
            "Message": message,
        },
    })
}

/// The body of a CloudWatch alarm state-change notification.
pub fn alarm_message(new_state: &str, old_state: &str, reason: &str) -> String {
    json!({
        "NewStateValue": new_state,
        "OldStateValue": old_state,
        "NewStateReason": reason,
    })
    .to_string()
}

/// The body of an RDS event notification.
pub fn database_event_message(source_id: &str, time: &str, event_id: &str, message: &str) -> String {
    json!({
        "Event Source": "db-instance",
        "Event Time": time,
        "Event ID": event_id,
        "Event Message": message,
        "Source ID": source_id,
    })
    .to_string()
}
