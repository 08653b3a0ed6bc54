use serde::Deserialize;

#[derive(Deserialize)]
pub struct Config {
    pub slack_webhook_url: String,
}
