mod cli;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;

use courier_notify::{
    Dispatcher, ElementNotifier, EmailNotifier, Notification, Notifier, NotifyError, SlackNotifier,
};

use crate::cli::Args;
use crate::config::ResolvedConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Hosting contract: echo the resolved directory paths.
    println!(
        "inputdir: {} outputdir: {}",
        args.inputdir.display(),
        args.outputdir.display()
    );

    let file_cfg = config::load_file_config(&args.inputdir)
        .context("failed to load config file")?;

    let resolved = ResolvedConfig::resolve(&args.field_values(), &file_cfg)
        .context("failed to resolve configuration")?;

    let notification = Notification::new(resolved.title.clone(), resolved.content.clone());

    let channels =
        build_channels(&resolved).context("failed to configure notification channels")?;
    let dispatcher = Dispatcher::new(channels);

    info!(channels = dispatcher.len(), "dispatching notification");

    dispatcher
        .dispatch(&notification)
        .await
        .context("notification delivery failed")?;

    Ok(())
}

/// Select channels by their minimum-field invariant, in dispatch order:
/// Slack needs a webhook URL, Element a room and a token, email at least
/// one recipient.
fn build_channels(cfg: &ResolvedConfig) -> std::result::Result<Vec<Box<dyn Notifier>>, NotifyError> {
    let mut channels: Vec<Box<dyn Notifier>> = Vec::new();

    if let Some(url) = &cfg.slack_url {
        channels.push(Box::new(SlackNotifier::from_config(url.clone())?));
    }

    if let (Some(room), Some(token)) = (&cfg.element_room, &cfg.element_token) {
        channels.push(Box::new(ElementNotifier::from_config(
            room.clone(),
            token.clone(),
            cfg.element_host.clone(),
        )?));
    }

    if let Some(rcpt) = &cfg.rcpt {
        channels.push(Box::new(EmailNotifier::from_config(
            rcpt,
            &cfg.mail_server,
            &cfg.sender,
        )?));
    }

    Ok(channels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(
        slack_url: Option<&str>,
        element: Option<(&str, &str)>,
        rcpt: Option<&str>,
    ) -> ResolvedConfig {
        ResolvedConfig {
            content: "hi".to_string(),
            title: None,
            slack_url: slack_url.map(str::to_string),
            element_room: element.map(|(room, _)| room.to_string()),
            element_token: element.map(|(_, token)| token.to_string()),
            element_host: "fedora.ems.host".to_string(),
            rcpt: rcpt.map(str::to_string),
            sender: "noreply@courier.local".to_string(),
            mail_server: "smtp.example.com".to_string(),
        }
    }

    #[test]
    fn no_channel_fields_selects_nothing() {
        let channels = build_channels(&resolved(None, None, None)).unwrap();
        assert!(channels.is_empty());
    }

    #[test]
    fn rcpt_alone_selects_only_email() {
        let channels = build_channels(&resolved(None, None, Some("a@b.com"))).unwrap();
        let names: Vec<_> = channels.iter().map(|c| c.channel_name()).collect();
        assert_eq!(names, ["email"]);
    }

    #[test]
    fn all_fields_select_all_channels_in_dispatch_order() {
        let channels = build_channels(&resolved(
            Some("https://hooks.slack.com/x"),
            Some(("!room:fedora.im", "token")),
            Some("a@b.com"),
        ))
        .unwrap();
        let names: Vec<_> = channels.iter().map(|c| c.channel_name()).collect();
        assert_eq!(names, ["slack", "element", "email"]);
    }

    #[test]
    fn element_requires_both_room_and_token() {
        let cfg = ResolvedConfig {
            element_token: None,
            ..resolved(None, Some(("!room:fedora.im", "token")), None)
        };
        let channels = build_channels(&cfg).unwrap();
        assert!(channels.is_empty());
    }
}
