//! Background expiry sweeper.
//!
//! The sweeper periodically evicts idle sessions from the registry. Each
//! sweep runs in its own task so a panicking sweep is contained there and
//! the periodic loop keeps ticking.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::registry::SessionRegistry;

/// Handle to a running sweeper task.
///
/// Dropping the handle leaves the sweeper running for the life of the
/// runtime; call [`SweeperHandle::shutdown`] to stop it cleanly.
pub struct SweeperHandle {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl SweeperHandle {
    /// Stop the sweeper and wait for its task to finish.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            tracing::error!(error = %e, "Sweeper task did not shut down cleanly");
        }
    }

    /// Returns true if the sweeper task has exited.
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

/// Spawn a sweeper that evicts sessions idle for longer than `ttl`, scanning
/// every `interval`.
pub fn spawn(registry: SessionRegistry, interval: Duration, ttl: Duration) -> SweeperHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let handle = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        // The first tick completes immediately; consume it so sweeps start
        // one full interval after spawn.
        ticker.tick().await;

        tracing::debug!(
            interval_secs = interval.as_secs(),
            ttl_secs = ttl.as_secs(),
            "Session sweeper started"
        );

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    tracing::debug!("Session sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let registry = registry.clone();
                    let sweep = tokio::spawn(async move {
                        registry.sweep_expired(ttl).await
                    });
                    if let Err(e) = sweep.await {
                        tracing::error!(error = %e, "Session sweep failed, will retry next tick");
                    }
                }
            }
        }
    });

    SweeperHandle { cancel, handle }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{PageContent, Session};

    fn create_test_session(id: &str) -> Session {
        Session::new(id, 3, |_page: usize| PageContent::new())
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_evicts_idle_sessions() {
        let registry = SessionRegistry::new();
        registry.insert(create_test_session("s1")).await;

        let handle = spawn(
            registry.clone(),
            Duration::from_secs(30),
            Duration::from_secs(300),
        );

        // Just before the first tick past the ttl the session is still there
        tokio::time::sleep(Duration::from_secs(301)).await;
        assert_eq!(registry.len().await, 1);

        // The tick at 330s sees 330s of idle time and evicts
        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(registry.len().await, 0);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_leaves_active_sessions() {
        let registry = SessionRegistry::new();
        registry.insert(create_test_session("s1")).await;

        let handle = spawn(
            registry.clone(),
            Duration::from_secs(30),
            Duration::from_secs(60),
        );

        // Re-insertion every 50s keeps the idle time under the 60s ttl
        for _ in 0..5 {
            tokio::time::sleep(Duration::from_secs(50)).await;
            registry.insert(create_test_session("s1")).await;
        }

        assert_eq!(registry.len().await, 1);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_joins_task() {
        let registry = SessionRegistry::new();
        let handle = spawn(
            registry,
            Duration::from_secs(30),
            Duration::from_secs(300),
        );

        assert!(!handle.is_finished());
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_keeps_ticking_between_sweeps() {
        let registry = SessionRegistry::new();
        let handle = spawn(
            registry.clone(),
            Duration::from_secs(30),
            Duration::from_secs(60),
        );

        // Sessions inserted at different times expire on different ticks
        registry.insert(create_test_session("a")).await;
        tokio::time::sleep(Duration::from_secs(45)).await;
        registry.insert(create_test_session("b")).await;

        // "a" goes at the 90s tick (90s idle), "b" at the 120s tick (75s idle)
        tokio::time::sleep(Duration::from_secs(76)).await;
        assert_eq!(registry.len().await, 0);

        handle.shutdown().await;
    }
}
