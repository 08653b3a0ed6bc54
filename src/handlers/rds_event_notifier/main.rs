mod config;

use crate::config::Config;
use async_trait::async_trait;
use common::config::ConfigLoader;
use serde_json::Value;
use sns_slack_relay::notification::dispatch::dispatch_records;
use sns_slack_relay::notification::message::render_database_event_notification;
use sns_slack_relay::notification::slack::{SlackWebhook, SlackWebhookClient};
use sns_slack_relay::{
    lambda_main, lambda_structure::lambda_trait::Lambda, result::error::LambdaError,
};
use std::sync::Arc;

pub struct Persisted {
    pub webhook: Arc<dyn SlackWebhook>,
}

/// Forwards RDS event notifications delivered over SNS to the team Slack
/// channel. Unlike alarm state changes these bodies are flat JSON with
/// spaced keys, and nothing is ever suppressed.
pub struct RdsEventNotifier;

#[async_trait]
impl Lambda for RdsEventNotifier {
    type PersistedMemory = Persisted;
    type InputBody = Value;
    type Output = ();
    type Error = LambdaError;

    async fn bootstrap() -> Result<Self::PersistedMemory, Self::Error> {
        let config = ConfigLoader::load_default::<Config>();
        let webhook: Arc<dyn SlackWebhook> =
            Arc::new(SlackWebhookClient::new(config.slack_webhook_url));

        Ok(Persisted { webhook })
    }

    async fn run(
        event: Self::InputBody,
        state: &Self::PersistedMemory,
    ) -> Result<Self::Output, Self::Error> {
        dispatch_records(event, &state.webhook, |notification| {
            Some(render_database_event_notification(notification))
        })
        .await
    }
}

lambda_main!(RdsEventNotifier);
