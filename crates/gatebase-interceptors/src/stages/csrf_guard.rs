use crate::context::{header, CallContext, ProtoCall, ProtoReply};
use crate::csrf::{CsrfFailure, CsrfStore};
use crate::errors::InterceptError;
use crate::stages::{Stage, StageOutcome};
use async_trait::async_trait;
use std::collections::HashSet;
use std::sync::Arc;

/// Validates anti-forgery tokens on the configured state-changing methods.
/// Methods off the allow-list pass through untouched.
pub struct CsrfStage {
    store: Arc<dyn CsrfStore>,
    protected: HashSet<String>,
}

impl CsrfStage {
    pub fn new(store: Arc<dyn CsrfStore>, protected: impl IntoIterator<Item = String>) -> Self {
        Self {
            store,
            protected: protected.into_iter().collect(),
        }
    }
}

#[async_trait]
impl Stage for CsrfStage {
    async fn handle(
        &self,
        cx: &mut CallContext,
        call: &mut dyn ProtoCall,
        _reply: &mut dyn ProtoReply,
    ) -> Result<StageOutcome, InterceptError> {
        if !self.protected.contains(call.method()) {
            return Ok(StageOutcome::Continue);
        }

        let Some(token) = call.metadata(header::CSRF_TOKEN).filter(|t| !t.is_empty()) else {
            return Err(InterceptError::csrf_missing());
        };

        let subject = cx.require_subject()?;

        match self.store.validate(&token, &subject.subject_id.0).await {
            Ok(()) => Ok(StageOutcome::Continue),
            Err(CsrfFailure::Missing) => Err(InterceptError::csrf_missing()),
            Err(CsrfFailure::Expired) => Err(InterceptError::csrf_rejected("token past its ttl")),
            Err(CsrfFailure::IdentityMismatch) => Err(InterceptError::csrf_rejected(
                "token bound to a different identity",
            )),
        }
    }
}
