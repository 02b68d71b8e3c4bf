//! Notification delivery engine for the courier CLI.
//!
//! This crate provides:
//! - `Notifier` trait for pluggable notification channels
//! - Slack (incoming webhook), Element/Matrix, and SMTP email implementations
//! - Sequential dispatcher that walks channels in a fixed order

pub mod dispatcher;
pub mod element;
pub mod email;
pub mod slack;
pub mod traits;

pub use dispatcher::Dispatcher;
pub use element::ElementNotifier;
pub use email::EmailNotifier;
pub use slack::SlackNotifier;
pub use traits::{Notification, Notifier, NotifyError};
