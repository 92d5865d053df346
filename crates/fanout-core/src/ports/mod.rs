//! Ports - 抽象化レイヤー
//!
//! runner が外部に依存する箇所はすべて trait にしてあります。
//! 出力先（console, buffer, logger）や時刻を差し替えることで、
//! 並行実行の性質をテストから決定的に観測できます。

pub mod clock;
pub mod id_generator;
pub mod sink;
pub mod unit;

pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, UlidGenerator};
pub use self::sink::OutputSink;
pub use self::unit::UnitOfWork;
