//! Domain model (index, message, ids, outcomes, errors).

pub mod errors;
pub mod ids;
pub mod index;
pub mod message;
pub mod outcome;

pub use self::errors::{FanOutError, SinkError, TaskFailure, UnitError};
pub use self::ids::RunId;
pub use self::index::TaskIndex;
pub use self::message::{DEFAULT_GREETING, OutputMessage};
pub use self::outcome::{FanOutCounts, FanOutReport, UnitOutcome};
