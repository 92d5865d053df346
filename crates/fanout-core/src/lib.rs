//! fanout-core
//!
//! Core building blocks for the fan-out runner.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（TaskIndex, OutputMessage, RunId, outcome, errors）
//! - **ports**: 抽象化レイヤー（OutputSink, UnitOfWork, Clock, IdGenerator）
//! - **impls**: ports の実装（StdoutSink, MemorySink, TracingSink, Greeter）
//! - **app**: アプリケーションロジック（FanOutRunner, CompletionLatch, CancelSignal, builder）

pub mod domain;
pub mod ports;
pub mod impls;
pub mod app;
