//! LambdaError is the error either notifier can fail an invocation with.
//! Parsing problems never reach it: the extraction layer falls back to
//! plain text instead. Only webhook delivery surfaces failure.

use crate::notification::slack::WebhookError;
use lambda_runtime::Error as LambdaRuntimeError;

pub type LambdaRuntimeResult = std::result::Result<(), LambdaRuntimeError>;

#[derive(Debug, thiserror::Error)]
pub enum LambdaError {
    #[error(transparent)]
    Webhook(#[from] WebhookError),
    #[error("{0:#}")]
    Unknown(#[source] anyhow::Error),
}
