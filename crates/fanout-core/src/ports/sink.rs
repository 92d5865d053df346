//! OutputSink port - 出力先の抽象化
//!
//! 複数の unit から同時に呼ばれます。書き込みの直列化は実装側の責任です
//! （runner は multi-writer safety を仮定しない）。

use async_trait::async_trait;

use crate::domain::{OutputMessage, SinkError};

#[async_trait]
pub trait OutputSink: Send + Sync {
    /// Write one message. Concurrent calls must not interleave within a message.
    async fn write(&self, message: &OutputMessage) -> Result<(), SinkError>;
}
