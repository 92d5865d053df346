//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **WriterSink / StdoutSink**: AsyncWrite に 1 行ずつ直列に書く
//! - **MemorySink**: メモリに溜める（テスト・埋め込み用）
//! - **TracingSink**: tracing のイベントとして出す
//! - **Greeter**: `"{greeting} {index}"` を返すデフォルトの UnitOfWork

pub mod greeter;
pub mod memory_sink;
pub mod tracing_sink;
pub mod writer_sink;

pub use self::greeter::Greeter;
pub use self::memory_sink::MemorySink;
pub use self::tracing_sink::TracingSink;
pub use self::writer_sink::{StdoutSink, WriterSink};
