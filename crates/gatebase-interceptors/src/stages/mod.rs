use crate::context::{CallContext, ProtoCall, ProtoReply};
use crate::errors::InterceptError;
use async_trait::async_trait;
use futures::future::BoxFuture;
use std::time::Instant;

#[async_trait]
pub trait Stage: Send + Sync {
    async fn handle(
        &self,
        cx: &mut CallContext,
        call: &mut dyn ProtoCall,
        reply: &mut dyn ProtoReply,
    ) -> Result<StageOutcome, InterceptError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageOutcome {
    Continue,
    ShortCircuit,
}

pub struct InterceptorChain {
    stages: Vec<Box<dyn Stage>>,
}

impl InterceptorChain {
    pub fn new(stages: Vec<Box<dyn Stage>>) -> Self {
        Self { stages }
    }

    /// Runs every stage in order, then the handler. Any stage rejection
    /// short-circuits straight to completion; the recorder fires on every
    /// exit path, including a caller disconnect that drops the future.
    pub async fn run_with_handler<F>(
        &self,
        mut cx: CallContext,
        call: &mut dyn ProtoCall,
        reply: &mut dyn ProtoReply,
        handler: F,
    ) -> Result<(), InterceptError>
    where
        F: for<'a> FnOnce(
                &'a mut CallContext,
                &'a mut dyn ProtoCall,
            ) -> BoxFuture<'a, Result<serde_json::Value, InterceptError>>
            + Send,
    {
        let mut recorder = CompletionRecorder::start(call.method());

        for stage in &self.stages {
            let outcome = stage.handle(&mut cx, call, reply).await;
            recorder.observe_context(&cx);
            match outcome {
                Ok(StageOutcome::Continue) => {}
                Ok(StageOutcome::ShortCircuit) => {
                    recorder.finish("short_circuit");
                    return Ok(());
                }
                Err(err) => {
                    recorder.finish(err.code().0);
                    return Err(err);
                }
            }
        }

        match handler(&mut cx, call).await {
            Ok(body) => {
                reply.set_status(200);
                if let Err(err) = reply.write_json(&body).await {
                    recorder.finish(err.code().0);
                    return Err(err);
                }
                recorder.finish("OK");
                Ok(())
            }
            Err(err) => {
                recorder.finish(err.code().0);
                Err(err)
            }
        }
    }
}

struct CompletionRecorder {
    method: String,
    correlation_id: String,
    started: Instant,
    outcome: Option<String>,
}

impl CompletionRecorder {
    fn start(method: &str) -> Self {
        Self {
            method: method.to_string(),
            correlation_id: String::new(),
            started: Instant::now(),
            outcome: None,
        }
    }

    fn observe_context(&mut self, cx: &CallContext) {
        if self.correlation_id.is_empty() && !cx.correlation_id.is_empty() {
            self.correlation_id = cx.correlation_id.clone();
        }
    }

    fn finish(&mut self, outcome: &str) {
        self.outcome = Some(outcome.to_string());
    }
}

impl Drop for CompletionRecorder {
    fn drop(&mut self) {
        // Runs even when the caller disconnects mid-flight: the call is
        // still recorded and consumed quota stays consumed.
        let outcome = self
            .outcome
            .take()
            .unwrap_or_else(|| "cancelled".to_string());
        let duration_ms = self.started.elapsed().as_millis() as u64;
        tracing::info!(
            target: "gatebase::interceptors",
            method = %self.method,
            correlation_id = %self.correlation_id,
            outcome = %outcome,
            duration_ms,
            "call completed"
        );
    }
}

pub mod authn;
pub mod correlation;
pub mod csrf_guard;
pub mod logging;
pub mod rate_limit;
