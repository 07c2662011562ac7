pub use crate::config::{
    AuthConfig, CsrfConfig, GovernanceConfig, MethodLimit, RateLimitConfig,
};
pub use crate::context::{header, CallContext, ProtoCall, ProtoReply};
pub use crate::csrf::{memory::MemoryCsrfStore, CsrfFailure, CsrfStore};
pub use crate::errors::{format_window, to_public_response, InterceptError};
pub use crate::governance::Governance;
pub use crate::identity::{
    client_ip, request_metadata, resolve_identifier, user_agent, RequestMetadata,
};
pub use crate::observe::call_labels;
pub use crate::stages::{
    authn::AuthnAnnotateStage, correlation::CorrelationStage, csrf_guard::CsrfStage,
    logging::LoggingStage, rate_limit::RateLimitStage, InterceptorChain, Stage, StageOutcome,
};
