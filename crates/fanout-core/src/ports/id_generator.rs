//! IdGenerator port - ID 生成の抽象化
//!
//! # 実装
//! - **UlidGenerator**: Clock の時刻 + 乱数で ULID を作る

use crate::domain::RunId;
use crate::ports::Clock;
use ulid::Ulid;

pub trait IdGenerator: Send + Sync {
    fn generate_run_id(&self) -> RunId;
}

/// UlidGenerator は ULID ベースの ID 生成器
///
/// Clock を使って現在時刻ベースの ULID を生成します。
/// FixedClock を渡せば timestamp 部分が固定されます（ランダム部分は毎回変わる）。
pub struct UlidGenerator<C> {
    clock: C,
}

impl<C: Clock> UlidGenerator<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }
}

impl<C: Clock> IdGenerator for UlidGenerator<C> {
    fn generate_run_id(&self) -> RunId {
        let timestamp_ms = self.clock.now().timestamp_millis() as u64;
        RunId::from(Ulid::from_parts(timestamp_ms, rand::random()))
    }
}
