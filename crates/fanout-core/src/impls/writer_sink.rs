//! WriterSink - AsyncWrite への直列書き込み
//!
//! # 実装詳細
//! - tokio の Mutex で writer を排他（lock を取れるまで unit は suspend する）
//! - 1 メッセージ = 1 行。改行込みで 1 回の write_all にまとめ、flush まで lock を保持
//! - StdoutSink は `WriterSink<tokio::io::Stdout>`

use async_trait::async_trait;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::domain::{OutputMessage, SinkError};
use crate::ports::OutputSink;

pub struct WriterSink<W> {
    writer: Mutex<W>,
}

pub type StdoutSink = WriterSink<tokio::io::Stdout>;

impl<W> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl WriterSink<tokio::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(tokio::io::stdout())
    }
}

#[async_trait]
impl<W> OutputSink for WriterSink<W>
where
    W: AsyncWrite + Unpin + Send,
{
    async fn write(&self, message: &OutputMessage) -> Result<(), SinkError> {
        let mut line = String::with_capacity(message.as_str().len() + 1);
        line.push_str(message.as_str());
        line.push('\n');

        let mut writer = self.writer.lock().await;
        writer.write_all(line.as_bytes()).await?;
        writer.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn writes_one_line_per_message() {
        let sink = WriterSink::new(Vec::<u8>::new());
        sink.write(&OutputMessage::new("first")).await.unwrap();
        sink.write(&OutputMessage::new("second")).await.unwrap();

        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert_eq!(out, "first\nsecond\n");
    }

    #[tokio::test]
    async fn concurrent_lines_do_not_interleave() {
        let sink = Arc::new(WriterSink::new(Vec::<u8>::new()));

        let mut joins = Vec::new();
        for i in 0..16 {
            let sink = Arc::clone(&sink);
            joins.push(tokio::spawn(async move {
                let msg = OutputMessage::new(format!("line {i} {}", "x".repeat(64)));
                sink.write(&msg).await.unwrap();
            }));
        }
        for j in joins {
            j.await.unwrap();
        }

        let sink = Arc::try_unwrap(sink).ok().unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 16);
        for line in lines {
            assert!(line.starts_with("line "));
            assert!(line.ends_with(&"x".repeat(64)));
        }
    }
}
