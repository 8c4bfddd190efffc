use std::{future::Future, time::Duration};

use tokio::task::JoinHandle;

/// Removes messages some time after they were sent.
#[derive(Debug, Clone, Copy)]
pub struct Janitor {
    delay: Duration,
}

/// Handle to a pending removal. Dropping it does not cancel the removal.
pub struct ScheduledRemoval(JoinHandle<()>);

impl ScheduledRemoval {
    pub fn cancel(&self) {
        self.0.abort();
    }

    pub fn is_finished(&self) -> bool {
        self.0.is_finished()
    }
}

impl Janitor {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn schedule<F>(&self, removal: F) -> ScheduledRemoval
    where
        F: Future<Output = anyhow::Result<()>> + Send + 'static,
    {
        let delay = self.delay;

        ScheduledRemoval(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Err(err) = removal.await {
                tracing::warn!("Failed to delete message: {err:#}");
            }
        }))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    };

    use super::*;

    fn flagging_removal(flag: Arc<AtomicBool>) -> impl Future<Output = anyhow::Result<()>> {
        async move {
            flag.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn removes_after_delay() {
        let janitor = Janitor::new(Duration::from_secs(300));
        let fired = Arc::new(AtomicBool::new(false));

        let handle = janitor.schedule(flagging_removal(fired.clone()));

        tokio::time::sleep(Duration::from_secs(299)).await;
        assert!(!fired.load(Ordering::SeqCst));

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(fired.load(Ordering::SeqCst));
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_removal_never_runs() {
        let janitor = Janitor::new(Duration::from_secs(300));
        let fired = Arc::new(AtomicBool::new(false));

        let handle = janitor.schedule(flagging_removal(fired.clone()));
        handle.cancel();

        tokio::time::sleep(Duration::from_secs(600)).await;
        assert!(!fired.load(Ordering::SeqCst));
        assert!(handle.is_finished());
    }

    #[tokio::test(start_paused = true)]
    async fn failed_removal_is_swallowed() {
        let janitor = Janitor::new(Duration::from_secs(1));

        let handle = janitor.schedule(async { Err(anyhow::anyhow!("message already gone")) });

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(handle.is_finished());
    }
}
