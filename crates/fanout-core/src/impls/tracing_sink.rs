//! TracingSink - logger を出力先にする

use async_trait::async_trait;
use tracing::info;

use crate::domain::{OutputMessage, SinkError};
use crate::ports::OutputSink;

/// Emits each message as an `info` event on the `fanout::output` target.
/// Serialization is left to the installed subscriber.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

#[async_trait]
impl OutputSink for TracingSink {
    async fn write(&self, message: &OutputMessage) -> Result<(), SinkError> {
        info!(target: "fanout::output", message = %message);
        Ok(())
    }
}
