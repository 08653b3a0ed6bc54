//! Fans one inbound SNS event out to the webhook, record by record.

use std::sync::Arc;

use anyhow::anyhow;
use serde_json::Value;

use crate::dtos::sns::{NotificationEvent, NotificationRecord, SnsNotification};
use crate::notification::message::RenderedNotification;
use crate::notification::slack::{SlackMessage, SlackWebhook};
use crate::result::error::LambdaError;

/// Per-invocation counts, logged once the batch is done.
#[derive(Debug, Default)]
struct DispatchSummary {
    forwarded: usize,
    suppressed: usize,
    skipped: usize,
}

/// Processes every record of the event independently: extract, filter,
/// forward. `render` is the handler's extractor; returning `None`
/// suppresses the record.
///
/// Deliveries are spawned without waiting for the previous one to finish,
/// so several may be in flight at once with no ordering between their
/// completions. The invocation outcome is the outcome of the **last**
/// forwarded record, matching what the upstream per-record completion
/// callback made observable in multi-record batches; earlier failures are
/// only logged.
pub async fn dispatch_records<R>(
    event: Value,
    webhook: &Arc<dyn SlackWebhook>,
    render: R,
) -> Result<(), LambdaError>
where
    R: Fn(&SnsNotification) -> Option<RenderedNotification>,
{
    let event = NotificationEvent::from_value(event);

    let mut summary = DispatchSummary::default();
    let mut deliveries = Vec::new();

    for record in event.records {
        let record = match serde_json::from_value::<NotificationRecord>(record) {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(error = %error, "unreadable record, skipping");
                summary.skipped += 1;
                continue;
            }
        };

        let notification = match record.sns {
            Some(notification) => notification,
            None => {
                tracing::warn!("record without Sns payload, skipping");
                summary.skipped += 1;
                continue;
            }
        };

        let rendered = match render(&notification) {
            Some(rendered) => rendered,
            None => {
                tracing::info!(subject = %notification.subject, "notification suppressed");
                summary.suppressed += 1;
                continue;
            }
        };

        summary.forwarded += 1;
        let webhook = Arc::clone(webhook);
        let message = SlackMessage::from(rendered);
        deliveries.push(tokio::spawn(
            async move { webhook.post_message(&message).await },
        ));
    }

    // Await in record order; the last delivery decides the outcome.
    let mut outcome = Ok(());
    for delivery in deliveries {
        outcome = match delivery.await {
            Ok(Ok(())) => Ok(()),
            Ok(Err(error)) => {
                tracing::error!(error = %error, "failed to post to the webhook");
                Err(LambdaError::from(error))
            }
            Err(error) => {
                tracing::error!(error = %error, "delivery task failed");
                Err(LambdaError::Unknown(anyhow!(error)))
            }
        };
    }

    tracing::info!(
        forwarded = summary.forwarded,
        suppressed = summary.suppressed,
        skipped = summary.skipped,
        "event processed"
    );

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notification::message::{render_alarm_notification, SeverityColor};
    use crate::notification::slack::WebhookError;
    use async_trait::async_trait;
    use common::test_tools::sns::{alarm_message, sns_event, sns_event_with_records, sns_record};
    use http::StatusCode;
    use mockall::mock;
    use mockall::predicate::eq;
    use serde_json::json;

    mock! {
        Webhook {}

        #[async_trait]
        impl SlackWebhook for Webhook {
            async fn post_message(&self, message: &SlackMessage) -> Result<(), WebhookError>;
        }
    }

    fn webhook(mock: MockWebhook) -> Arc<dyn SlackWebhook> {
        Arc::new(mock)
    }

    fn alarm_slack_message(subject: &str, reason: &str, color: SeverityColor) -> SlackMessage {
        SlackMessage::from(RenderedNotification {
            text: format!("{subject}\nReason: {reason}"),
            color,
        })
    }

    #[tokio::test]
    async fn empty_and_malformed_events_are_a_no_op() {
        for event in [json!({}), json!({ "Records": [] }), json!("garbage")] {
            let mut mock = MockWebhook::new();
            mock.expect_post_message().never();

            dispatch_records(event, &webhook(mock), render_alarm_notification)
                .await
                .expect("should succeed");
        }
    }

    #[tokio::test]
    async fn records_without_sns_are_skipped() {
        let event = sns_event_with_records(vec![
            json!({ "EventSource": "aws:s3" }),
            json!("not even an object"),
        ]);

        let mut mock = MockWebhook::new();
        mock.expect_post_message().never();

        dispatch_records(event, &webhook(mock), render_alarm_notification)
            .await
            .expect("should succeed");
    }

    #[tokio::test]
    async fn a_forwarded_record_posts_exactly_once() {
        let event = sns_event(
            "ALARM: high cpu",
            &alarm_message("ALARM", "OK", "threshold crossed"),
        );

        let mut mock = MockWebhook::new();
        mock.expect_post_message()
            .with(eq(alarm_slack_message(
                "ALARM: high cpu",
                "threshold crossed",
                SeverityColor::Alerting,
            )))
            .once()
            .returning(|_| Ok(()));

        dispatch_records(event, &webhook(mock), render_alarm_notification)
            .await
            .expect("should succeed");
    }

    #[tokio::test]
    async fn suppressed_records_post_nothing() {
        let event = sns_event(
            "OK: high cpu",
            &alarm_message("OK", "INSUFFICIENT_DATA", "recovered"),
        );

        let mut mock = MockWebhook::new();
        mock.expect_post_message().never();

        dispatch_records(event, &webhook(mock), render_alarm_notification)
            .await
            .expect("should succeed");
    }

    #[tokio::test]
    async fn an_early_failure_does_not_block_later_records() {
        let event = sns_event_with_records(vec![
            sns_record("ALARM: first", &alarm_message("ALARM", "OK", "first")),
            sns_record("ALARM: second", &alarm_message("ALARM", "OK", "second")),
        ]);

        let mut mock = MockWebhook::new();
        mock.expect_post_message()
            .with(eq(alarm_slack_message(
                "ALARM: first",
                "first",
                SeverityColor::Alerting,
            )))
            .once()
            .returning(|_| Err(WebhookError::UnexpectedStatus(StatusCode::INTERNAL_SERVER_ERROR)));
        mock.expect_post_message()
            .with(eq(alarm_slack_message(
                "ALARM: second",
                "second",
                SeverityColor::Alerting,
            )))
            .once()
            .returning(|_| Ok(()));

        // The last record succeeded, so the invocation does.
        dispatch_records(event, &webhook(mock), render_alarm_notification)
            .await
            .expect("should succeed");
    }

    #[tokio::test]
    async fn the_last_forwarded_record_decides_the_outcome() {
        let event = sns_event_with_records(vec![
            sns_record("ALARM: first", &alarm_message("ALARM", "OK", "first")),
            sns_record("ALARM: second", &alarm_message("ALARM", "OK", "second")),
        ]);

        let mut mock = MockWebhook::new();
        mock.expect_post_message()
            .with(eq(alarm_slack_message(
                "ALARM: first",
                "first",
                SeverityColor::Alerting,
            )))
            .once()
            .returning(|_| Ok(()));
        mock.expect_post_message()
            .with(eq(alarm_slack_message(
                "ALARM: second",
                "second",
                SeverityColor::Alerting,
            )))
            .once()
            .returning(|_| Err(WebhookError::UnexpectedStatus(StatusCode::NOT_FOUND)));

        let error = dispatch_records(event, &webhook(mock), render_alarm_notification)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            LambdaError::Webhook(WebhookError::UnexpectedStatus(status)) if status == StatusCode::NOT_FOUND
        ));
    }

    #[tokio::test]
    async fn dispatching_the_same_event_twice_posts_identical_payloads() {
        let event = sns_event(
            "ALARM: high cpu",
            &alarm_message("ALARM", "OK", "threshold crossed"),
        );
        let expected = alarm_slack_message(
            "ALARM: high cpu",
            "threshold crossed",
            SeverityColor::Alerting,
        );

        let mut mock = MockWebhook::new();
        mock.expect_post_message()
            .with(eq(expected))
            .times(2)
            .returning(|_| Ok(()));
        let webhook = webhook(mock);

        for _ in 0..2 {
            dispatch_records(event.clone(), &webhook, render_alarm_notification)
                .await
                .expect("should succeed");
        }
    }
}
