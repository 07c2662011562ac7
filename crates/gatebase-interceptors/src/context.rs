use async_trait::async_trait;
use gatebase_types::prelude::*;
use http::Extensions;

/// Metadata keys the governance stack reads and writes. Keys are lower-case
/// to match gRPC metadata conventions.
pub mod header {
    pub const CORRELATION_ID: &str = "x-correlation-id";
    pub const AUTHORIZATION: &str = "authorization";
    pub const GATEWAY_AUTHORIZATION: &str = "grpcgateway-authorization";
    pub const REAL_IP: &str = "x-real-ip";
    pub const FORWARDED_FOR: &str = "x-forwarded-for";
    pub const USER_AGENT: &str = "user-agent";
    pub const GATEWAY_USER_AGENT: &str = "grpcgateway-user-agent";
    pub const CSRF_TOKEN: &str = "x-csrf-token";
    pub const USER_ID: &str = "user_id";
}

/// Per-call state owned by the chain. Stages read and extend it; handlers
/// only read.
#[derive(Clone, Debug)]
pub struct CallContext {
    pub method: String,
    pub correlation_id: String,
    pub subject: Option<Subject>,
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub extensions: Extensions,
}

impl Default for CallContext {
    fn default() -> Self {
        Self {
            method: String::new(),
            correlation_id: String::new(),
            subject: None,
            client_ip: None,
            user_agent: None,
            extensions: Extensions::new(),
        }
    }
}

impl CallContext {
    pub fn new(method: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            ..Self::default()
        }
    }

    pub fn subject(&self) -> Option<&Subject> {
        self.subject.as_ref()
    }

    /// Handler-side authentication enforcement: the chain annotates identity
    /// when it can, handlers that need one reject here.
    pub fn require_subject(&self) -> Result<&Subject, crate::errors::InterceptError> {
        self.subject.as_ref().ok_or_else(|| {
            crate::errors::InterceptError::unauthenticated("caller identity required")
        })
    }

    /// Stable caller identifier, `user:<id>` when authenticated, otherwise
    /// `ip:<addr>` when a client address is known.
    pub fn identity(&self) -> Option<String> {
        if let Some(subject) = &self.subject {
            return Some(format!("user:{}", subject.subject_id.0));
        }
        self.client_ip.as_ref().map(|ip| format!("ip:{ip}"))
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    pub fn client_ip(&self) -> Option<&str> {
        self.client_ip.as_deref()
    }

    pub fn user_agent(&self) -> Option<&str> {
        self.user_agent.as_deref()
    }
}

/// Transport-facing view of an inbound call: the method name plus readable
/// and appendable metadata. Appended pairs travel with the call into
/// downstream services.
#[async_trait]
pub trait ProtoCall: Send {
    fn method(&self) -> &str;
    fn metadata(&self, name: &str) -> Option<String>;
    fn append_metadata(&mut self, name: &str, value: &str);
    async fn read_json(&mut self) -> Result<serde_json::Value, crate::errors::InterceptError>;
}

#[async_trait]
pub trait ProtoReply: Send {
    fn set_status(&mut self, code: u16);
    fn insert_metadata(&mut self, name: &str, value: &str);
    async fn write_json(
        &mut self,
        body: &serde_json::Value,
    ) -> Result<(), crate::errors::InterceptError>;
}
