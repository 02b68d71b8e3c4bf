//! Slack incoming-webhook notifier.
//!
//! Delivers notifications as a JSON `{"text": ...}` payload to a Slack
//! incoming webhook URL. The title is rendered as a bold `*title*` line
//! above the content.

use crate::traits::{resolve_env_vars, Notification, Notifier, NotifyError};

/// Build the Slack message text from an optional title and the content.
///
/// The title becomes a `*bold*` line; title and content are joined by a
/// newline, with either line omitted when absent.
pub fn build_text(title: Option<&str>, content: &str) -> String {
    let mut lines = Vec::with_capacity(2);
    if let Some(title) = title.filter(|t| !t.is_empty()) {
        lines.push(format!("*{title}*"));
    }
    if !content.is_empty() {
        lines.push(content.to_string());
    }
    lines.join("\n")
}

/// Sends notifications to a Slack incoming webhook.
#[derive(Debug)]
pub struct SlackNotifier {
    /// Target webhook URL (env vars already resolved).
    url: String,
    /// Shared HTTP client (connection pooling).
    client: reqwest::Client,
}

impl SlackNotifier {
    /// Create a notifier from a webhook URL.
    ///
    /// Environment variable references (`${VAR_NAME}`) in the URL are
    /// resolved eagerly; a missing variable produces a
    /// [`NotifyError::Config`] error.
    pub fn from_config(url: String) -> Result<Self, NotifyError> {
        let resolved_url = resolve_env_vars(&url)?;

        if resolved_url.is_empty() {
            return Err(NotifyError::Config(
                "Slack webhook URL must not be empty".to_string(),
            ));
        }

        Ok(Self {
            url: resolved_url,
            client: reqwest::Client::new(),
        })
    }
}

#[async_trait::async_trait]
impl Notifier for SlackNotifier {
    /// POST the notification text as JSON to the webhook URL.
    ///
    /// Slack acknowledges accepted payloads with HTTP 200; anything else
    /// surfaces as [`NotifyError::UnexpectedStatus`].
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let text = build_text(notification.title.as_deref(), &notification.content);
        let body = serde_json::json!({ "text": text });

        let response = self
            .client
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let reason = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            tracing::warn!(
                url = %self.url,
                %status,
                %reason,
                "Slack webhook returned non-200 status"
            );
            return Err(NotifyError::UnexpectedStatus {
                channel: "slack",
                status,
                reason,
            });
        }

        tracing::debug!(url = %self.url, %status, "Slack notification delivered");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "slack"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_text_title_and_content() {
        assert_eq!(build_text(Some("T"), "C"), "*T*\nC");
    }

    #[test]
    fn build_text_content_only() {
        assert_eq!(build_text(None, "C"), "C");
    }

    #[test]
    fn build_text_empty_title_treated_as_absent() {
        assert_eq!(build_text(Some(""), "C"), "C");
    }

    #[test]
    fn build_text_title_only() {
        assert_eq!(build_text(Some("T"), ""), "*T*");
    }

    #[test]
    fn build_text_nothing() {
        assert_eq!(build_text(None, ""), "");
    }

    #[test]
    fn from_config_plain_url() {
        let notifier =
            SlackNotifier::from_config("https://hooks.slack.com/services/T0/B0/xyz".into())
                .unwrap();
        assert_eq!(notifier.url, "https://hooks.slack.com/services/T0/B0/xyz");
    }

    #[test]
    fn from_config_env_reference() {
        std::env::set_var("SLACK_TEST_HOOK", "https://hooks.slack.com/services/T1/B1/abc");
        let notifier = SlackNotifier::from_config("${SLACK_TEST_HOOK}".into()).unwrap();
        assert_eq!(notifier.url, "https://hooks.slack.com/services/T1/B1/abc");
        std::env::remove_var("SLACK_TEST_HOOK");
    }

    #[test]
    fn from_config_empty_url_rejected() {
        let result = SlackNotifier::from_config(String::new());
        assert!(result.is_err());
        let err = result.unwrap_err().to_string();
        assert!(err.contains("must not be empty"), "got: {err}");
    }

    #[test]
    fn channel_name_is_slack() {
        let notifier = SlackNotifier::from_config("https://example.com/hook".into()).unwrap();
        assert_eq!(notifier.channel_name(), "slack");
    }
}
