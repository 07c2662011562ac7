use crate::context::{header, CallContext, ProtoCall, ProtoReply};
use crate::errors::InterceptError;
use crate::identity;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;

/// Chain entry stage: stamps the correlation id and captures the caller's
/// network facts before any guard runs.
pub struct CorrelationStage;

#[async_trait]
impl Stage for CorrelationStage {
    async fn handle(
        &self,
        cx: &mut CallContext,
        call: &mut dyn ProtoCall,
        reply: &mut dyn ProtoReply,
    ) -> Result<StageOutcome, InterceptError> {
        cx.method = call.method().to_string();

        let correlation_id = call
            .metadata(header::CORRELATION_ID)
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        cx.correlation_id = correlation_id.clone();

        // Downstream services and the response both carry the id.
        call.append_metadata(header::CORRELATION_ID, &correlation_id);
        reply.insert_metadata(header::CORRELATION_ID, &correlation_id);

        cx.client_ip = identity::client_ip(call);
        cx.user_agent = identity::user_agent(call);

        Ok(StageOutcome::Continue)
    }
}
