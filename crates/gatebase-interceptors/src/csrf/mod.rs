use crate::errors::InterceptError;
use async_trait::async_trait;

pub mod memory;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CsrfFailure {
    Missing,
    Expired,
    IdentityMismatch,
}

#[async_trait]
pub trait CsrfStore: Send + Sync {
    async fn issue(&self, identity: &str) -> Result<String, InterceptError>;
    async fn validate(&self, token: &str, identity: &str) -> Result<(), CsrfFailure>;
    async fn invalidate(&self, token: &str);
}
