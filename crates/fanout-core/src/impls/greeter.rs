//! Greeter - デフォルトの UnitOfWork

use async_trait::async_trait;

use crate::domain::{DEFAULT_GREETING, OutputMessage, TaskIndex, UnitError};
use crate::ports::UnitOfWork;

pub struct Greeter {
    greeting: String,
}

impl Greeter {
    pub fn new(greeting: impl Into<String>) -> Self {
        Self {
            greeting: greeting.into(),
        }
    }
}

impl Default for Greeter {
    fn default() -> Self {
        Self::new(DEFAULT_GREETING)
    }
}

#[async_trait]
impl UnitOfWork for Greeter {
    async fn produce(&self, index: TaskIndex) -> Result<OutputMessage, UnitError> {
        Ok(OutputMessage::greeting(&self.greeting, index))
    }
}
