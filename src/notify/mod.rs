//! # Notification Sink
//!
//! Narrow interface to the external reporting collaborator: it accepts a
//! preformatted text/HTML status message and nothing else. Delivery failure
//! is logged by callers and never aborts a run.

use crate::config::{FailurePolicy, NotificationsConfig};
use crate::error::{DroverError, Result};
use crate::orchestration::types::FlowSummary;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Destination for preformatted status messages.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, message: &str) -> Result<()>;
}

/// Sink that drops every message. Used when notifications are disabled.
#[derive(Default)]
pub struct NullNotifier;

#[async_trait]
impl Notifier for NullNotifier {
    async fn send(&self, _message: &str) -> Result<()> {
        Ok(())
    }
}

/// Telegram bot sink delivering HTML-formatted messages to each configured
/// chat.
pub struct TelegramNotifier {
    client: reqwest::Client,
    bot_token: String,
    chat_ids: Vec<i64>,
}

impl TelegramNotifier {
    pub fn new(config: &NotificationsConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DroverError::Notify(format!("cannot build HTTP client: {e}")))?;
        Ok(Self {
            client,
            bot_token: config.bot_token.clone(),
            chat_ids: config.chat_ids.clone(),
        })
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, message: &str) -> Result<()> {
        let url = format!("https://api.telegram.org/bot{}/sendMessage", self.bot_token);

        for chat_id in &self.chat_ids {
            let response = self
                .client
                .post(&url)
                .json(&serde_json::json!({
                    "chat_id": chat_id,
                    "text": message,
                    "parse_mode": "HTML",
                }))
                .send()
                .await
                .map_err(|e| DroverError::Notify(format!("telegram request failed: {e}")))?;

            if !response.status().is_success() {
                return Err(DroverError::Notify(format!(
                    "telegram responded with status {}",
                    response.status()
                )));
            }
            debug!(chat_id, "notification delivered");
        }
        Ok(())
    }
}

/// Build the configured sink: Telegram when enabled, otherwise a null sink.
pub fn notifier_from_config(config: &NotificationsConfig) -> Result<Box<dyn Notifier>> {
    if config.enabled {
        Ok(Box::new(TelegramNotifier::new(config)?))
    } else {
        Ok(Box::new(NullNotifier))
    }
}

/// Render the single end-of-run report for one account.
pub fn format_account_report(summary: &FlowSummary, policy: FailurePolicy) -> String {
    let mut message = format!(
        "🤖 Drover Report\n\n💳 Account: {} | <code>{}</code>\n\n",
        summary.account_index,
        summary.masked()
    );

    if !summary.completed.is_empty() {
        message.push_str("✅ Completed Tasks:\n");
        for (i, task) in summary.completed.iter().enumerate() {
            message.push_str(&format!("{}. {}\n", i + 1, task));
        }
        message.push('\n');
    }

    if !summary.failed.is_empty() {
        message.push_str("❌ Failed Tasks:\n");
        for (i, task) in summary.failed.iter().enumerate() {
            message.push_str(&format!("{}. {}\n", i + 1, task));
        }
        message.push('\n');
    }

    let policy_label = match policy {
        FailurePolicy::Strict => "strict",
        FailurePolicy::Lenient => "lenient",
    };
    message.push_str(&format!(
        "📊 Statistics:\nTotal Tasks: {}\nCompleted: {}\nFailed: {}\nSuccess Rate: {:.1}%\n\n⚙️ Settings:\nFailure Policy: {}\n",
        summary.total_planned,
        summary.completed.len(),
        summary.failed.len(),
        summary.success_rate(),
        policy_label
    ));

    message
}

/// Render a fatal per-account error report.
pub fn format_fatal_report(account_index: usize, masked_identifier: &str, error: &str) -> String {
    format!(
        "⚠️ Error Report\n\nAccount #{account_index}\nWallet: <code>{masked_identifier}</code>\nError: {error}"
    )
}
