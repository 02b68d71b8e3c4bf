//! Walks configured channels in a fixed order.
//!
//! The dispatcher delivers one notification to every configured channel
//! strictly in sequence. The first channel failure propagates immediately
//! and later channels are not attempted.

use crate::traits::{Notification, Notifier, NotifyError};

/// Dispatches a notification to an ordered list of channels.
pub struct Dispatcher {
    channels: Vec<Box<dyn Notifier>>,
}

impl Dispatcher {
    /// Create a dispatcher over an ordered channel list.
    pub fn new(channels: Vec<Box<dyn Notifier>>) -> Self {
        Self { channels }
    }

    /// Number of configured channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// True when no channel is configured.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Deliver `notification` through each channel in order.
    ///
    /// Returns on the first channel error; channels listed after a failing
    /// one are not attempted.
    pub async fn dispatch(&self, notification: &Notification) -> Result<(), NotifyError> {
        if self.channels.is_empty() {
            tracing::debug!("No notification channels configured");
            return Ok(());
        }

        for channel in &self.channels {
            let start = std::time::Instant::now();
            let result = channel.send(notification).await;
            let duration_ms = start.elapsed().as_millis() as u64;

            match result {
                Ok(()) => {
                    tracing::info!(
                        channel = channel.channel_name(),
                        duration_ms,
                        "Notification delivered"
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        channel = channel.channel_name(),
                        error = %e,
                        duration_ms,
                        "Notification delivery failed, aborting remaining channels"
                    );
                    return Err(e);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct MockNotifier {
        name: String,
        send_count: Arc<AtomicUsize>,
        should_fail: bool,
    }

    #[async_trait::async_trait]
    impl Notifier for MockNotifier {
        async fn send(&self, _notification: &Notification) -> Result<(), NotifyError> {
            self.send_count.fetch_add(1, Ordering::SeqCst);
            if self.should_fail {
                Err(NotifyError::Config("mock failure".to_string()))
            } else {
                Ok(())
            }
        }
        fn channel_name(&self) -> &str {
            &self.name
        }
    }

    fn mock(name: &str, count: &Arc<AtomicUsize>, should_fail: bool) -> Box<dyn Notifier> {
        Box::new(MockNotifier {
            name: name.to_string(),
            send_count: count.clone(),
            should_fail,
        })
    }

    #[tokio::test]
    async fn dispatch_to_all_channels_in_order() {
        let count_a = Arc::new(AtomicUsize::new(0));
        let count_b = Arc::new(AtomicUsize::new(0));

        let dispatcher = Dispatcher::new(vec![
            mock("a", &count_a, false),
            mock("b", &count_b, false),
        ]);

        let notification = Notification::new(Some("test".to_string()), "test body");

        dispatcher.dispatch(&notification).await.unwrap();
        assert_eq!(count_a.load(Ordering::SeqCst), 1);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn first_failure_aborts_remaining_channels() {
        let count_first = Arc::new(AtomicUsize::new(0));
        let count_second = Arc::new(AtomicUsize::new(0));

        let dispatcher = Dispatcher::new(vec![
            mock("failing", &count_first, true),
            mock("never-reached", &count_second, false),
        ]);

        let notification = Notification::new(None, "test body");

        let result = dispatcher.dispatch(&notification).await;
        assert!(result.is_err());
        assert_eq!(count_first.load(Ordering::SeqCst), 1);
        // The channel after the failing one must never be invoked.
        assert_eq!(count_second.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn failure_in_middle_still_runs_earlier_channels() {
        let count_a = Arc::new(AtomicUsize::new(0));
        let count_b = Arc::new(AtomicUsize::new(0));
        let count_c = Arc::new(AtomicUsize::new(0));

        let dispatcher = Dispatcher::new(vec![
            mock("a", &count_a, false),
            mock("b", &count_b, true),
            mock("c", &count_c, false),
        ]);

        let notification = Notification::new(None, "body");

        let result = dispatcher.dispatch(&notification).await;
        assert!(result.is_err());
        assert_eq!(count_a.load(Ordering::SeqCst), 1);
        assert_eq!(count_b.load(Ordering::SeqCst), 1);
        assert_eq!(count_c.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_dispatcher_is_a_no_op() {
        let dispatcher = Dispatcher::new(Vec::new());
        assert!(dispatcher.is_empty());
        let notification = Notification::new(None, "body");
        dispatcher.dispatch(&notification).await.unwrap();
    }
}
