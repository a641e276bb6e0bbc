use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use serenity::all::{GuildId, UserId};
use tokio::task::JoinHandle;
use tracing::debug;

/// Pending automatic releases: one cancellable one-shot task per active
/// confinement. The ledger, not the timer, decides who releases a member,
/// so an aborted or stray timer is never more than a wasted wakeup.
#[derive(Debug, Default)]
pub struct ReleaseScheduler {
    pending: Arc<DashMap<(GuildId, UserId), JoinHandle<()>>>,
}

impl ReleaseScheduler {
    pub fn new() -> Self {
        Self {
            pending: Arc::new(DashMap::new()),
        }
    }

    /// Arm a one-shot timer that runs `on_expire` after `delay`. The task
    /// removes its own handle before running the release, so a concurrent
    /// `cancel` for the same key cannot abort a release in progress.
    pub fn schedule<F>(&self, guild_id: GuildId, user_id: UserId, delay: Duration, on_expire: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let key = (guild_id, user_id);
        let pending = Arc::clone(&self.pending);
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            pending.remove(&key);
            on_expire.await;
        });

        // The ledger rejects duplicate confinements, so a live handle under
        // this key means the member was released and re-confined; the old
        // timer is stale.
        if let Some(old) = self.pending.insert(key, handle) {
            old.abort();
        }
    }

    /// Abort a pending automatic release. Returns false if none was pending.
    pub fn cancel(&self, guild_id: GuildId, user_id: UserId) -> bool {
        match self.pending.remove(&(guild_id, user_id)) {
            Some((_, handle)) => {
                handle.abort();
                debug!(
                    "Cancelled pending release for user {} in guild {}",
                    user_id, guild_id
                );
                true
            }
            None => false,
        }
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_fires_after_delay_and_cleans_up() {
        let scheduler = ReleaseScheduler::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        scheduler.schedule(
            GuildId::new(1),
            UserId::new(2),
            Duration::from_secs(60),
            async move {
                tx.send(()).ok();
            },
        );
        assert_eq!(scheduler.pending_count(), 1);

        rx.recv().await.expect("timer fires");
        // The task removed its own handle before running
        tokio::task::yield_now().await;
        assert_eq!(scheduler.pending_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_firing() {
        let scheduler = ReleaseScheduler::new();
        let (tx, mut rx) = mpsc::unbounded_channel();

        scheduler.schedule(
            GuildId::new(1),
            UserId::new(2),
            Duration::from_secs(60),
            async move {
                tx.send(()).ok();
            },
        );

        assert!(scheduler.cancel(GuildId::new(1), UserId::new(2)));
        assert_eq!(scheduler.pending_count(), 0);

        // Well past the original deadline, nothing fired
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_without_pending_is_noop() {
        let scheduler = ReleaseScheduler::new();
        assert!(!scheduler.cancel(GuildId::new(1), UserId::new(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_reschedule_replaces_old_timer() {
        let scheduler = ReleaseScheduler::new();
        let (old_tx, mut old_rx) = mpsc::unbounded_channel();
        let (new_tx, mut new_rx) = mpsc::unbounded_channel();

        scheduler.schedule(
            GuildId::new(1),
            UserId::new(2),
            Duration::from_secs(60),
            async move {
                old_tx.send(()).ok();
            },
        );
        scheduler.schedule(
            GuildId::new(1),
            UserId::new(2),
            Duration::from_secs(60),
            async move {
                new_tx.send(()).ok();
            },
        );
        assert_eq!(scheduler.pending_count(), 1);

        new_rx.recv().await.expect("replacement timer fires");
        tokio::time::sleep(Duration::from_secs(120)).await;
        assert!(old_rx.try_recv().is_err());
    }
}
