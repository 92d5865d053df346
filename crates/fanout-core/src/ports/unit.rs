//! UnitOfWork port - 1 つの unit が行う計算
//!
//! index を値で受け取り、message を 1 つ返します。
//! panic しても runner 側の unit 境界で回収されるので、兄弟 unit には影響しません。

use async_trait::async_trait;

use crate::domain::{OutputMessage, TaskIndex, UnitError};

#[async_trait]
pub trait UnitOfWork: Send + Sync {
    async fn produce(&self, index: TaskIndex) -> Result<OutputMessage, UnitError>;
}
