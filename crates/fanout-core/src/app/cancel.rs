//! CancelSignal - best-effort なキャンセル
//!
//! `watch` チャネルの送信側を Arc で共有するだけのハンドルです。
//! unit は開始直前に一度だけ `is_cancelled()` を見ます。実行中の unit は止めません。

use std::sync::Arc;

use tokio::sync::watch;

#[derive(Debug, Clone)]
pub struct CancelSignal {
    tx: Arc<watch::Sender<bool>>,
}

impl CancelSignal {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Request cancellation. Idempotent.
    pub fn cancel(&self) {
        // send() fails without receivers; send_replace always stores the value
        self.tx.send_replace(true);
    }

    pub fn is_cancelled(&self) -> bool {
        *self.tx.borrow()
    }
}

impl Default for CancelSignal {
    fn default() -> Self {
        Self::new()
    }
}
