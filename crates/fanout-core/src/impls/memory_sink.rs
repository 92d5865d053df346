//! MemorySink - メモリ上の出力先
//!
//! tokio の Mutex で Vec を守るだけの実装です。
//! 書き込まれた順（= 実行時の到着順）で保持します。

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{OutputMessage, SinkError};
use crate::ports::OutputSink;

#[derive(Default)]
pub struct MemorySink {
    messages: Mutex<Vec<OutputMessage>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot in arrival order.
    pub async fn messages(&self) -> Vec<OutputMessage> {
        self.messages.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.messages.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.messages.lock().await.is_empty()
    }
}

#[async_trait]
impl OutputSink for MemorySink {
    async fn write(&self, message: &OutputMessage) -> Result<(), SinkError> {
        self.messages.lock().await.push(message.clone());
        Ok(())
    }
}
