use std::{
    future::Future,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

use tokio::sync::watch;

#[derive(Clone)]
pub struct SessionLifetime {
    disposed: Arc<watch::Sender<bool>>,
}

impl Default for SessionLifetime {
    fn default() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self {
            disposed: Arc::new(tx),
        }
    }
}

impl SessionLifetime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dispose(&self) {
        self.disposed.send_replace(true);
    }

    pub fn is_disposed(&self) -> bool {
        *self.disposed.borrow()
    }

    /// Drives `fut` to completion unless the session is disposed first.
    pub async fn run<F: Future>(&self, fut: F) -> Option<F::Output> {
        let mut rx = self.disposed.subscribe();
        let disposed = async move {
            loop {
                let done = *rx.borrow_and_update();
                if done || rx.changed().await.is_err() {
                    return;
                }
            }
        };

        tokio::select! {
            biased;
            () = disposed => None,
            output = fut => Some(output),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Workflow {
    Create,
    ChangePosition,
    Delete,
}

#[derive(Default)]
pub(crate) struct BusyFlags {
    create: AtomicBool,
    change_position: AtomicBool,
    delete: AtomicBool,
}

impl BusyFlags {
    fn flag(&self, workflow: Workflow) -> &AtomicBool {
        match workflow {
            Workflow::Create => &self.create,
            Workflow::ChangePosition => &self.change_position,
            Workflow::Delete => &self.delete,
        }
    }

    pub(crate) fn is_busy(&self, workflow: Workflow) -> bool {
        self.flag(workflow).load(Ordering::Acquire)
    }

    pub(crate) fn try_acquire(&self, workflow: Workflow) -> Option<BusyGuard<'_>> {
        let flag = self.flag(workflow);
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard { flag })
    }
}

pub(crate) struct BusyGuard<'a> {
    flag: &'a AtomicBool,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn busy_flag_is_exclusive_until_guard_drops() {
        let flags = BusyFlags::default();
        let guard = flags.try_acquire(Workflow::Delete).expect("first acquire");
        assert!(flags.is_busy(Workflow::Delete));
        assert!(flags.try_acquire(Workflow::Delete).is_none());
        assert!(!flags.is_busy(Workflow::Create));

        drop(guard);
        assert!(!flags.is_busy(Workflow::Delete));
        assert!(flags.try_acquire(Workflow::Delete).is_some());
    }

    #[tokio::test]
    async fn run_completes_while_mounted() {
        let lifetime = SessionLifetime::new();
        assert_eq!(lifetime.run(async { 42 }).await, Some(42));
    }

    #[tokio::test]
    async fn run_returns_none_after_dispose() {
        let lifetime = SessionLifetime::new();
        lifetime.dispose();
        assert!(lifetime.is_disposed());
        assert_eq!(lifetime.run(async { 42 }).await, None);
    }

    #[tokio::test]
    async fn dispose_abandons_pending_future() {
        let lifetime = SessionLifetime::new();
        let pending = {
            let lifetime = lifetime.clone();
            tokio::spawn(async move {
                lifetime
                    .run(tokio::time::sleep(Duration::from_secs(30)))
                    .await
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        lifetime.dispose();

        let result = tokio::time::timeout(Duration::from_secs(2), pending)
            .await
            .expect("run should return promptly")
            .expect("join");
        assert!(result.is_none());
    }
}
