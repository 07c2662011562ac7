use gatebase_errors::prelude::*;
use serde_json::json;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct InterceptError(pub ErrorObj);

impl InterceptError {
    pub fn into_inner(self) -> ErrorObj {
        self.0
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code
    }

    pub fn internal(msg: &str) -> Self {
        InterceptError(
            ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
                .user_msg("Internal error. Please retry later.")
                .dev_msg(msg)
                .build(),
        )
    }

    pub fn from_error(err: ErrorObj) -> Self {
        InterceptError(err)
    }

    pub fn from_public(code: ErrorCode, msg: &str) -> Self {
        InterceptError(ErrorBuilder::new(code).user_msg(msg).build())
    }

    pub fn unauthenticated(msg: &str) -> Self {
        InterceptError(
            ErrorBuilder::new(codes::AUTH_UNAUTHENTICATED)
                .user_msg("Please sign in.")
                .dev_msg(msg)
                .build(),
        )
    }

    pub fn identity_unresolved(msg: &str) -> Self {
        InterceptError(
            ErrorBuilder::new(codes::AUTH_IDENTITY_UNRESOLVED)
                .user_msg("Unable to identify the caller.")
                .dev_msg(msg)
                .build(),
        )
    }

    pub fn rate_limited(capacity: u32, window: Duration) -> Self {
        InterceptError(
            ErrorBuilder::new(codes::QUOTA_RATELIMIT)
                .user_msg(format!(
                    "rate limit exceeded: maximum {capacity} requests per {}",
                    format_window(window)
                ))
                .meta_kv("capacity", json!(capacity))
                .meta_kv("window_secs", json!(window.as_secs()))
                .build(),
        )
    }

    pub fn csrf_missing() -> Self {
        InterceptError(
            ErrorBuilder::new(codes::CSRF_TOKEN_MISSING)
                .user_msg("Anti-forgery token is required for this operation.")
                .build(),
        )
    }

    pub fn csrf_rejected(msg: &str) -> Self {
        InterceptError(
            ErrorBuilder::new(codes::CSRF_TOKEN_REJECTED)
                .user_msg("Invalid or expired anti-forgery token.")
                .dev_msg(msg)
                .build(),
        )
    }

    pub fn config_invalid(msg: &str) -> Self {
        InterceptError(
            ErrorBuilder::new(codes::CONFIG_INVALID)
                .user_msg("Service is misconfigured.")
                .dev_msg(msg)
                .build(),
        )
    }
}

pub fn format_window(window: Duration) -> String {
    let secs = window.as_secs();
    if secs >= 3600 && secs % 3600 == 0 {
        format!("{}h", secs / 3600)
    } else if secs >= 60 && secs % 60 == 0 {
        format!("{}m", secs / 60)
    } else {
        format!("{secs}s")
    }
}

pub fn to_public_response(err: &InterceptError) -> (u16, serde_json::Value) {
    let obj = &err.0;
    let public = obj.to_public();
    (
        obj.http_status,
        serde_json::json!({
            "code": public.code,
            "message": public.message,
            "correlation_id": public.correlation_id
        }),
    )
}
