mod config;

use crate::config::Config;
use async_trait::async_trait;
use common::config::ConfigLoader;
use serde_json::Value;
use sns_slack_relay::notification::dispatch::dispatch_records;
use sns_slack_relay::notification::message::render_alarm_notification;
use sns_slack_relay::notification::slack::{SlackWebhook, SlackWebhookClient};
use sns_slack_relay::{
    lambda_main, lambda_structure::lambda_trait::Lambda, result::error::LambdaError,
};
use std::sync::Arc;

pub struct Persisted {
    pub webhook: Arc<dyn SlackWebhook>,
}

/// Forwards CloudWatch alarm state changes delivered over SNS to the team
/// Slack channel, dropping the noisy INSUFFICIENT_DATA -> OK recoveries.
pub struct CloudwatchAlarmNotifier;

#[async_trait]
impl Lambda for CloudwatchAlarmNotifier {
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
        dispatch_records(event, &state.webhook, render_alarm_notification).await
    }
}

lambda_main!(CloudwatchAlarmNotifier);
