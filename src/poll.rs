//! Notification unread-count polling.
//!
//! The portal has no push channel; the unread badge is refreshed by a
//! fixed-interval poll. The poller is owned by the page controller and
//! stopped through its cancellation token on teardown. Ticks that land
//! while the user is signed out are skipped, not errored, so a sign-out
//! mid-interval is harmless.

use std::time::Duration;

use async_trait::async_trait;
use schoolcal_core::FetchError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::identity::Identity;

/// Notification collaborator: reports the unread count for a user.
#[async_trait]
pub trait NotificationFeed: Send + Sync {
    async fn unread_count(&self, user_id: &str) -> Result<u64, FetchError>;
}

/// Poller settings.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// How often to check the unread count.
    pub interval: Duration,
}

impl Default for PollerConfig {
    fn default() -> Self {
        PollerConfig {
            interval: Duration::from_secs(30),
        }
    }
}

/// Handle to a running unread-count poll.
///
/// Dropping the handle cancels the loop, so a discarded page controller
/// cannot leak its timer.
pub struct NotificationPoller {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl NotificationPoller {
    /// Spawn the poll loop. `on_count` receives each successfully
    /// fetched unread count, starting with an immediate first tick.
    pub fn spawn<F, I, C>(feed: F, identity: I, config: PollerConfig, on_count: C) -> Self
    where
        F: NotificationFeed + 'static,
        I: Identity + 'static,
        C: Fn(u64) + Send + Sync + 'static,
    {
        let token = CancellationToken::new();
        let loop_token = token.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(config.interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                let Some(user) = identity.current_user() else {
                    debug!("Skipping notification poll tick: not signed in");
                    continue;
                };

                match feed.unread_count(&user.user_id).await {
                    Ok(count) => on_count(count),
                    Err(error) => warn!("Notification poll failed: {}", error),
                }
            }
        });

        NotificationPoller { token, handle }
    }

    /// Stop the poll loop. Safe to call more than once.
    pub fn stop(&self) {
        self.token.cancel();
    }

    /// Whether the loop has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for NotificationPoller {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UserContext;
    use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
    use std::sync::Arc;

    struct FixedFeed {
        count: u64,
    }

    #[async_trait]
    impl NotificationFeed for FixedFeed {
        async fn unread_count(&self, _user_id: &str) -> Result<u64, FetchError> {
            Ok(self.count)
        }
    }

    struct ToggleIdentity {
        signed_in: Arc<AtomicBool>,
    }

    impl Identity for ToggleIdentity {
        fn current_user(&self) -> Option<UserContext> {
            self.signed_in.load(Ordering::SeqCst).then(|| UserContext {
                user_id: "alice".to_string(),
                group_ids: vec![],
            })
        }
    }

    fn poller(
        signed_in: Arc<AtomicBool>,
        delivered: Arc<AtomicU64>,
    ) -> NotificationPoller {
        NotificationPoller::spawn(
            FixedFeed { count: 7 },
            ToggleIdentity { signed_in },
            PollerConfig {
                interval: Duration::from_secs(30),
            },
            move |count| {
                assert_eq!(count, 7);
                delivered.fetch_add(1, Ordering::SeqCst);
            },
        )
    }

    #[tokio::test(start_paused = true)]
    async fn test_delivers_counts_every_interval() {
        let delivered = Arc::new(AtomicU64::new(0));
        let poller = poller(Arc::new(AtomicBool::new(true)), delivered.clone());

        tokio::time::sleep(Duration::from_secs(95)).await;
        // Ticks at 0s, 30s, 60s and 90s.
        assert_eq!(delivered.load(Ordering::SeqCst), 4);
        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_skips_ticks_while_signed_out() {
        let signed_in = Arc::new(AtomicBool::new(false));
        let delivered = Arc::new(AtomicU64::new(0));
        let poller = poller(signed_in.clone(), delivered.clone());

        tokio::time::sleep(Duration::from_secs(65)).await;
        assert_eq!(delivered.load(Ordering::SeqCst), 0);

        // Signing back in resumes delivery on the next tick.
        signed_in.store(true, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(35)).await;
        assert!(delivered.load(Ordering::SeqCst) >= 1);
        poller.stop();
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_halts_the_loop() {
        let delivered = Arc::new(AtomicU64::new(0));
        let poller = poller(Arc::new(AtomicBool::new(true)), delivered.clone());

        tokio::time::sleep(Duration::from_secs(35)).await;
        poller.stop();
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(poller.is_finished());

        let after_stop = delivered.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(delivered.load(Ordering::SeqCst), after_stop);
    }
}
