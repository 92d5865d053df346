//! CompletionLatch - 完了カウンタ（wait-group）
//!
//! # 学習ポイント
//! - AtomicUsize の減算 + Notify による待機
//! - Drop で減算するので、unit が panic して unwind しても必ずカウントが進む
//! - `notified()` を enable してから残数を読むことで、通知の取りこぼしを防ぐ

use std::pin::pin;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Notify;

struct Inner {
    remaining: AtomicUsize,
    notify: Notify,
}

/// Counting barrier sized at construction. Hand one `LatchGuard` to each unit.
#[derive(Clone)]
pub struct CompletionLatch {
    inner: Arc<Inner>,
}

impl CompletionLatch {
    pub fn new(count: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                remaining: AtomicUsize::new(count),
                notify: Notify::new(),
            }),
        }
    }

    /// Guard that counts one unit down when dropped.
    pub fn guard(&self) -> LatchGuard {
        LatchGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    pub fn remaining(&self) -> usize {
        self.inner.remaining.load(Ordering::Acquire)
    }

    /// Block until the count reaches zero. Returns immediately for a zero-sized latch.
    pub async fn wait(&self) {
        loop {
            let mut notified = pin!(self.inner.notify.notified());
            notified.as_mut().enable();

            if self.remaining() == 0 {
                return;
            }
            notified.await;
        }
    }
}

pub struct LatchGuard {
    inner: Arc<Inner>,
}

impl Drop for LatchGuard {
    fn drop(&mut self) {
        // saturating: extra guards beyond the initial count are no-ops
        let prev = self
            .inner
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1));
        if prev == Ok(1) {
            self.inner.notify.notify_waiters();
        }
    }
}
