use crate::context::{header, CallContext, ProtoCall, ProtoReply};
use crate::errors::InterceptError;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;
use gatebase_auth::prelude::TokenCodec;
use std::sync::Arc;

/// Annotates the context with a validated identity when a bearer credential
/// is present. Absent or invalid credentials are not fatal here; endpoints
/// that require identity enforce it via `CallContext::require_subject`.
pub struct AuthnAnnotateStage {
    pub codec: Arc<TokenCodec>,
}

#[async_trait]
impl Stage for AuthnAnnotateStage {
    async fn handle(
        &self,
        cx: &mut CallContext,
        call: &mut dyn ProtoCall,
        _reply: &mut dyn ProtoReply,
    ) -> Result<StageOutcome, InterceptError> {
        let Some(authorization) = call
            .metadata(header::AUTHORIZATION)
            .or_else(|| call.metadata(header::GATEWAY_AUTHORIZATION))
        else {
            return Ok(StageOutcome::Continue);
        };

        let Some(token) = authorization.strip_prefix("Bearer ") else {
            return Ok(StageOutcome::Continue);
        };
        if token.is_empty() {
            return Ok(StageOutcome::Continue);
        }

        match self.codec.validate(token) {
            Ok(claims) => {
                let subject = claims.subject();
                call.append_metadata(header::USER_ID, &subject.subject_id.0);
                cx.subject = Some(subject);
            }
            Err(err) => {
                tracing::debug!(
                    target: "gatebase::interceptors",
                    correlation_id = %cx.correlation_id,
                    code = err.code().0,
                    "bearer credential rejected; continuing anonymously"
                );
            }
        }

        Ok(StageOutcome::Continue)
    }
}
