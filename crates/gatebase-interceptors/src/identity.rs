use crate::context::{header, CallContext, ProtoCall};
use crate::errors::InterceptError;

/// Resolves the one identifier rate limiting keys on. Fails closed: an
/// unidentifiable caller must never fall into a shared placeholder bucket.
pub fn resolve_identifier(
    cx: &CallContext,
    call: &dyn ProtoCall,
) -> Result<String, InterceptError> {
    if let Some(subject) = cx.subject.as_ref() {
        return Ok(format!("user:{}", subject.subject_id.0));
    }

    if let Some(ip) = cx.client_ip.clone().or_else(|| client_ip(call)) {
        return Ok(format!("ip:{ip}"));
    }

    Err(InterceptError::identity_unresolved(
        "no authenticated subject or client address in call metadata",
    ))
}

/// Trusted reverse-proxy address first; the forwarded-for chain is client
/// supplied and only consulted as a fallback.
pub fn client_ip(call: &dyn ProtoCall) -> Option<String> {
    if let Some(real_ip) = non_empty(call.metadata(header::REAL_IP)) {
        return Some(real_ip.trim().to_string());
    }

    if let Some(forwarded) = non_empty(call.metadata(header::FORWARDED_FOR)) {
        let client = forwarded.split(',').next().unwrap_or("").trim();
        if !client.is_empty() {
            return Some(client.to_string());
        }
    }

    None
}

pub fn user_agent(call: &dyn ProtoCall) -> Option<String> {
    non_empty(call.metadata(header::USER_AGENT))
        .or_else(|| non_empty(call.metadata(header::GATEWAY_USER_AGENT)))
}

/// Snapshot of the request facts handlers commonly log.
#[derive(Clone, Debug, Default)]
pub struct RequestMetadata {
    pub client_ip: Option<String>,
    pub user_agent: Option<String>,
    pub identity: Option<String>,
}

pub fn request_metadata(cx: &CallContext, call: &dyn ProtoCall) -> RequestMetadata {
    RequestMetadata {
        client_ip: cx.client_ip.clone().or_else(|| client_ip(call)),
        user_agent: cx.user_agent.clone().or_else(|| user_agent(call)),
        identity: cx.identity(),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
