use crate::context::{CallContext, ProtoCall, ProtoReply};
use crate::errors::InterceptError;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;

/// Observational only: logs admitted calls and never alters the outcome.
pub struct LoggingStage;

#[async_trait]
impl Stage for LoggingStage {
    async fn handle(
        &self,
        cx: &mut CallContext,
        _call: &mut dyn ProtoCall,
        _reply: &mut dyn ProtoReply,
    ) -> Result<StageOutcome, InterceptError> {
        tracing::info!(
            target: "gatebase::interceptors",
            method = %cx.method,
            correlation_id = %cx.correlation_id,
            identity = cx.identity().as_deref().unwrap_or(""),
            user_agent = cx.user_agent().unwrap_or(""),
            "call admitted"
        );
        Ok(StageOutcome::Continue)
    }
}
