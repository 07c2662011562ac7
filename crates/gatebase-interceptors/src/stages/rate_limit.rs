use crate::context::{CallContext, ProtoCall, ProtoReply};
use crate::errors::InterceptError;
use crate::identity;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;
use gatebase_auth::prelude::{GateOutcome, RateGate};
use std::sync::Arc;

pub struct RateLimitStage {
    pub gate: Arc<dyn RateGate>,
}

#[async_trait]
impl Stage for RateLimitStage {
    async fn handle(
        &self,
        cx: &mut CallContext,
        call: &mut dyn ProtoCall,
        _reply: &mut dyn ProtoReply,
    ) -> Result<StageOutcome, InterceptError> {
        // Fail closed: a caller that cannot be identified is refused service
        // rather than pooled into a shared bucket.
        let identifier = identity::resolve_identifier(cx, call)?;
        let method = call.method().to_string();

        let outcome = self
            .gate
            .check(&method, &identifier)
            .await
            .map_err(|err| InterceptError::from_error(err.into_inner()))?;

        match outcome {
            GateOutcome::Admitted => Ok(StageOutcome::Continue),
            GateOutcome::Rejected { capacity, window } => {
                tracing::warn!(
                    target: "gatebase::interceptors",
                    method = %method,
                    identifier = %identifier,
                    correlation_id = %cx.correlation_id,
                    "rate limit exceeded"
                );
                Err(InterceptError::rate_limited(capacity, window))
            }
        }
    }
}
