// src/crawl/group.rs
// =============================================================================
// Completion tracking for a task tree that grows while it runs.
//
// Every branch owns a WorkToken. A parent creates the token for a child
// *before* spawning it and keeps its own token until it returns, so the
// outstanding count can only reach zero once the last leaf has finished.
// wait() resolves at that moment.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    outstanding: AtomicUsize,
    idle: Notify,
}

#[derive(Debug, Clone, Default)]
pub struct WorkGroup {
    inner: Arc<Inner>,
}

// One unit of registered work. Dropping it marks the work finished, which
// also covers branches that return early or panic.
#[derive(Debug)]
#[must_use = "dropping the token immediately marks the work as finished"]
pub struct WorkToken {
    inner: Arc<Inner>,
}

impl WorkGroup {
    pub fn new() -> Self {
        Self::default()
    }

    // Registers one more unit of work. Call before tokio::spawn, never inside
    // the spawned task.
    pub fn add(&self) -> WorkToken {
        self.inner.outstanding.fetch_add(1, Ordering::AcqRel);
        WorkToken {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn outstanding(&self) -> usize {
        self.inner.outstanding.load(Ordering::Acquire)
    }

    // Resolves once the outstanding count is zero.
    pub async fn wait(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // Register interest before reading the counter so a drop that
            // lands in between still wakes us
            notified.as_mut().enable();

            if self.outstanding() == 0 {
                return;
            }
            notified.await;
        }
    }
}

impl Drop for WorkToken {
    fn drop(&mut self) {
        if self.inner.outstanding.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn test_wait_without_work_returns() {
        let group = WorkGroup::new();
        timeout(Duration::from_secs(1), group.wait()).await.unwrap();
    }

    #[tokio::test]
    async fn test_wait_blocks_until_token_dropped() {
        let group = WorkGroup::new();
        let token = group.add();

        assert!(timeout(Duration::from_millis(50), group.wait()).await.is_err());

        drop(token);
        timeout(Duration::from_secs(1), group.wait()).await.unwrap();
        assert_eq!(group.outstanding(), 0);
    }

    // Each task registers its children before finishing; a tree of 1 + 4 + 16
    // tasks must all be done when wait() returns.
    fn spawn_tree(group: WorkGroup, token: WorkToken, depth: u32, done: Arc<AtomicUsize>) {
        tokio::spawn(async move {
            let _token = token;
            tokio::time::sleep(Duration::from_millis(5)).await;
            if depth > 0 {
                for _ in 0..4 {
                    let child = group.add();
                    spawn_tree(group.clone(), child, depth - 1, Arc::clone(&done));
                }
            }
            done.fetch_add(1, Ordering::SeqCst);
        });
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_nested_spawns_complete() {
        let group = WorkGroup::new();
        let done = Arc::new(AtomicUsize::new(0));

        let root = group.add();
        spawn_tree(group.clone(), root, 2, Arc::clone(&done));

        timeout(Duration::from_secs(5), group.wait()).await.unwrap();
        assert_eq!(done.load(Ordering::SeqCst), 1 + 4 + 16);
        assert_eq!(group.outstanding(), 0);
    }
}
