use crate::errors::AuthError;
use crate::model::GateOutcome;
use async_trait::async_trait;

pub mod fixed_window;

#[async_trait]
pub trait RateGate: Send + Sync {
    async fn check(&self, method: &str, identifier: &str) -> Result<GateOutcome, AuthError>;
}
