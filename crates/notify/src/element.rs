//! Element (Matrix) room-message notifier.
//!
//! Delivers notifications via the Matrix client-server API
//! `PUT /_matrix/client/v3/rooms/{roomId}/send/m.room.message/{txnId}`
//! endpoint, with an HTML-formatted body and a plain-text fallback.

use crate::traits::{resolve_env_vars, Notification, Notifier, NotifyError};

/// Homeserver used when no host is configured.
pub const DEFAULT_HOST: &str = "fedora.ems.host";

/// Client-generated transaction id prefix. The Matrix server deduplicates
/// retried sends by transaction id, so one id per logical send suffices.
const TXN_PREFIX: &str = "courierbot";

/// Build the HTML-formatted body and its plain-text fallback.
///
/// Formatted: `<h6>[BOT]title</h6>content` (heading only when the title is
/// absent is `<h6>[BOT]</h6>`). Plain: `[BOT][title] content`, the content
/// segment omitted when empty.
pub fn build_bodies(title: Option<&str>, content: &str) -> (String, String) {
    let title = title.filter(|t| !t.is_empty());

    let mut formatted = match title {
        Some(title) => format!("<h6>[BOT]{title}</h6>"),
        None => "<h6>[BOT]</h6>".to_string(),
    };

    let mut plain_parts = vec![match title {
        Some(title) => format!("[BOT][{title}]"),
        None => "[BOT]".to_string(),
    }];

    if !content.is_empty() {
        formatted.push_str(content);
        plain_parts.push(content.to_string());
    }

    (formatted, plain_parts.join(" "))
}

/// Normalize a room identifier into its percent-encoded URL form.
///
/// Identifiers already starting with the encoded sigil `%21` pass through
/// unchanged. Otherwise a leading `!` is prepended when missing and the
/// whole identifier is percent-encoded, leaving `/` unescaped.
pub fn normalize_room(room: &str) -> String {
    if room.starts_with("%21") {
        return room.to_string();
    }

    let room = if room.starts_with('!') {
        room.to_string()
    } else {
        format!("!{room}")
    };

    room.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Sends notifications into a Matrix room via the Element homeserver API.
#[derive(Debug)]
pub struct ElementNotifier {
    /// Percent-encoded room identifier.
    room: String,
    /// Access token (env vars already resolved).
    token: String,
    /// Homeserver host.
    host: String,
    client: reqwest::Client,
}

impl ElementNotifier {
    /// Create a notifier from room, access token, and homeserver host.
    ///
    /// If `token` contains `${VAR_NAME}` references they are resolved from
    /// the environment. An empty `host` falls back to [`DEFAULT_HOST`].
    /// Returns [`NotifyError::Config`] if the token resolves to empty.
    pub fn from_config(room: String, token: String, host: String) -> Result<Self, NotifyError> {
        let resolved_token = resolve_env_vars(&token)?;

        if resolved_token.is_empty() {
            return Err(NotifyError::Config(
                "Element access token must not be empty".to_string(),
            ));
        }

        let host = if host.is_empty() {
            DEFAULT_HOST.to_string()
        } else {
            host
        };

        Ok(Self {
            room: normalize_room(&room),
            token: resolved_token,
            host,
            client: reqwest::Client::new(),
        })
    }

    /// Fresh transaction id: fixed bot prefix + current time in milliseconds.
    fn txn_id() -> String {
        format!("{TXN_PREFIX}{}", chrono::Utc::now().timestamp_millis())
    }
}

#[async_trait::async_trait]
impl Notifier for ElementNotifier {
    /// PUT the room message to the homeserver.
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let (formatted, plain) = build_bodies(notification.title.as_deref(), &notification.content);

        let body = serde_json::json!({
            "formatted_body": formatted,
            "body": plain,
            "msgtype": "m.text",
            "format": "org.matrix.custom.html",
        });

        let url = format!(
            "https://{}/_matrix/client/v3/rooms/{}/send/m.room.message/{}?access_token={}",
            self.host,
            self.room,
            Self::txn_id(),
            self.token
        );

        tracing::debug!(host = %self.host, room = %self.room, "Sending Element notification");

        let response = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .header(reqwest::header::ACCEPT, "application/json")
            .header("Access-Control-Allow-Origin", "*")
            .header("Access-Control-Allow-Methods", "GET, POST, PUT, DELETE, OPTIONS")
            .header(
                "Access-Control-Allow-Headers",
                "X-Requested-With, Content-Type, Authorization",
            )
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
                host = %self.host,
                room = %self.room,
                %status,
                %reason,
                "Element homeserver returned non-200 status"
            );
            return Err(NotifyError::UnexpectedStatus {
                channel: "element",
                status,
                reason,
            });
        }

        tracing::debug!(host = %self.host, room = %self.room, "Element notification delivered");
        Ok(())
    }

    fn channel_name(&self) -> &str {
        "element"
    }
}
