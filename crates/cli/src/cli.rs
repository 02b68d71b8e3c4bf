use std::collections::HashMap;
use std::path::PathBuf;

use clap::Parser;

/// Notification through mail / Slack / Element.
///
/// Every flag may instead be supplied through the optional
/// `.notification.yaml` inside the input directory; see the per-field
/// precedence rules in `config::FIELDS`.
#[derive(Parser, Debug, Clone)]
#[command(name = "courier", version, about = "Notification through mail / Slack / Element")]
pub struct Args {
    /// Content of the notification. Required here or in [inputdir]/.notification.yaml.
    #[arg(short = 'c', long, default_value = "")]
    pub content: String,

    /// Title of the notification.
    #[arg(short = 't', long, default_value = "")]
    pub title: String,

    /// Slack incoming-webhook URL; presence enables the Slack channel.
    #[arg(short = 's', long, default_value = "")]
    pub slack_url: String,

    /// Element room id (e.g. !room-id:fedora.im); with --element-token, enables the Element channel.
    #[arg(short = 'e', long, default_value = "")]
    pub element_room: String,

    /// Element access token. Required if --element-room is set.
    #[arg(short = 'E', long, default_value = "")]
    pub element_token: String,

    /// Element homeserver host. The config-file value takes priority over this flag.
    #[arg(long, default_value = courier_notify::element::DEFAULT_HOST)]
    pub element_host: String,

    /// Comma-separated email recipients; presence enables the email channel.
    #[arg(short = 'r', long, default_value = "")]
    pub rcpt: String,

    /// Sender (From) address for email. The config-file value takes priority over this flag.
    #[arg(short = 'S', long, default_value = "noreply@courier.local")]
    pub sender: String,

    /// SMTP relay host. The config-file value takes priority over this flag.
    #[arg(short = 'M', long, default_value = "postfix.postfix.svc.cluster.local")]
    pub mail_server: String,

    /// Input directory, optionally holding .notification.yaml.
    #[arg(value_name = "INPUTDIR")]
    pub inputdir: PathBuf,

    /// Output directory (hosting contract; not written to).
    #[arg(value_name = "OUTPUTDIR")]
    pub outputdir: PathBuf,
}

impl Args {
    /// Flag values keyed by the config-file key names, as consumed by the
    /// precedence resolver.
    pub fn field_values(&self) -> HashMap<&'static str, String> {
        HashMap::from([
            ("content", self.content.clone()),
            ("title", self.title.clone()),
            ("slack-url", self.slack_url.clone()),
            ("element-room", self.element_room.clone()),
            ("element-token", self.element_token.clone()),
            ("element-host", self.element_host.clone()),
            ("rcpt", self.rcpt.clone()),
            ("sender", self.sender.clone()),
            ("mail-server", self.mail_server.clone()),
        ])
    }
}
