//! Notifier trait definition and shared error types.

/// Errors that can occur during notification delivery.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("{channel} endpoint returned {status}: {reason}")]
    UnexpectedStatus {
        channel: &'static str,
        status: reqwest::StatusCode,
        reason: String,
    },

    #[error("SMTP delivery failed: {0}")]
    Smtp(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// A resolved notification ready for delivery.
///
/// `title` is `None` when neither the CLI argument nor the config file
/// supplied one; channels render a title-less variant of their payload.
#[derive(Debug, Clone)]
pub struct Notification {
    /// Optional title, rendered per-channel (Slack bold line, Element `<h6>`
    /// heading, email subject).
    pub title: Option<String>,
    /// The message body.
    pub content: String,
}

impl Notification {
    /// Convenience constructor used by the CLI and tests.
    pub fn new(title: Option<String>, content: impl Into<String>) -> Self {
        Self {
            title,
            content: content.into(),
        }
    }
}

/// Trait for notification channel implementations.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver a notification through this channel.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;

    /// Human-readable name for this channel (e.g., "slack", "email").
    fn channel_name(&self) -> &str;
}

/// Resolve `${VAR_NAME}` patterns in a string using `std::env::var`.
///
/// Used for webhook URLs and access tokens so secrets can live in the
/// environment instead of flags or config files. Returns an error if a
/// referenced variable is not set.
pub(crate) fn resolve_env_vars(input: &str) -> Result<String, NotifyError> {
    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '$' && chars.peek() == Some(&'{') {
            // Consume the '{'
            chars.next();
            let mut var_name = String::new();
            let mut closed = false;
            for c in chars.by_ref() {
                if c == '}' {
                    closed = true;
                    break;
                }
                var_name.push(c);
            }
            if !closed {
                return Err(NotifyError::Config(format!(
                    "unclosed env var reference in: {input}"
                )));
            }
            let value = std::env::var(&var_name)
                .map_err(|_| NotifyError::Config(format!("env var not found: {var_name}")))?;
            result.push_str(&value);
        } else {
            result.push(ch);
        }
    }

    Ok(result)
}
