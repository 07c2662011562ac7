use crate::{kind::ErrorKind, retry::RetryClass, severity::Severity};
use once_cell::sync::Lazy;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ErrorCode(pub &'static str);

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(ErrorCode(Box::leak(s.into_boxed_str())))
    }
}

#[derive(Clone, Debug)]
pub struct CodeSpec {
    pub code: ErrorCode,
    pub kind: ErrorKind,
    pub http_status: u16,
    pub grpc_status: Option<i32>,
    pub retryable: RetryClass,
    pub severity: Severity,
    pub default_user_msg: &'static str,
}

pub mod codes {
    use super::ErrorCode;

    pub const AUTH_UNAUTHENTICATED: ErrorCode = ErrorCode("AUTH.UNAUTHENTICATED");
    pub const AUTH_INVALID_CREDENTIAL: ErrorCode = ErrorCode("AUTH.INVALID_CREDENTIAL");
    pub const AUTH_CREDENTIAL_EXPIRED: ErrorCode = ErrorCode("AUTH.CREDENTIAL_EXPIRED");
    pub const AUTH_CREDENTIAL_NOT_YET_VALID: ErrorCode =
        ErrorCode("AUTH.CREDENTIAL_NOT_YET_VALID");
    pub const AUTH_FORBIDDEN: ErrorCode = ErrorCode("AUTH.FORBIDDEN");
    pub const AUTH_IDENTITY_UNRESOLVED: ErrorCode = ErrorCode("AUTH.IDENTITY_UNRESOLVED");
    pub const QUOTA_RATELIMIT: ErrorCode = ErrorCode("QUOTA.RATE_LIMITED");
    pub const CSRF_TOKEN_MISSING: ErrorCode = ErrorCode("CSRF.TOKEN_MISSING");
    pub const CSRF_TOKEN_REJECTED: ErrorCode = ErrorCode("CSRF.TOKEN_REJECTED");
    pub const CONFIG_INVALID: ErrorCode = ErrorCode("CONFIG.INVALID");
    pub const SCHEMA_VALIDATION: ErrorCode = ErrorCode("SCHEMA.VALIDATION_FAILED");
    pub const UNKNOWN_INTERNAL: ErrorCode = ErrorCode("UNKNOWN.INTERNAL");
}

const fn grpc(code: i32) -> Option<i32> {
    Some(code)
}

pub static REGISTRY: Lazy<HashMap<&'static str, CodeSpec>> = Lazy::new(|| {
    use codes::*;

    let mut map = HashMap::new();
    let mut add = |spec: CodeSpec| {
        let key = spec.code.0;
        if map.insert(key, spec).is_some() {
            panic!("duplicate error code: {}", key);
        }
    };

    add(CodeSpec {
        code: AUTH_UNAUTHENTICATED,
        kind: ErrorKind::Auth,
        http_status: 401,
        grpc_status: grpc(16),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Please sign in.",
    });

    add(CodeSpec {
        code: AUTH_INVALID_CREDENTIAL,
        kind: ErrorKind::Auth,
        http_status: 401,
        grpc_status: grpc(16),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Invalid credential.",
    });

    add(CodeSpec {
        code: AUTH_CREDENTIAL_EXPIRED,
        kind: ErrorKind::Auth,
        http_status: 401,
        grpc_status: grpc(16),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Credential has expired. Please sign in again.",
    });

    add(CodeSpec {
        code: AUTH_CREDENTIAL_NOT_YET_VALID,
        kind: ErrorKind::Auth,
        http_status: 401,
        grpc_status: grpc(16),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Credential is not valid yet.",
    });

    add(CodeSpec {
        code: AUTH_FORBIDDEN,
        kind: ErrorKind::Auth,
        http_status: 403,
        grpc_status: grpc(7),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "You don't have permission to perform this action.",
    });

    add(CodeSpec {
        code: AUTH_IDENTITY_UNRESOLVED,
        kind: ErrorKind::Precondition,
        http_status: 400,
        grpc_status: grpc(9),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Unable to identify the caller.",
    });

    add(CodeSpec {
        code: QUOTA_RATELIMIT,
        kind: ErrorKind::RateLimit,
        http_status: 429,
        grpc_status: grpc(8),
        retryable: RetryClass::Transient,
        severity: Severity::Warn,
        default_user_msg: "Too many requests. Please retry later.",
    });

    add(CodeSpec {
        code: CSRF_TOKEN_MISSING,
        kind: ErrorKind::Precondition,
        http_status: 400,
        grpc_status: grpc(3),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Anti-forgery token is required for this operation.",
    });

    add(CodeSpec {
        code: CSRF_TOKEN_REJECTED,
        kind: ErrorKind::Auth,
        http_status: 403,
        grpc_status: grpc(7),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Invalid or expired anti-forgery token.",
    });

    add(CodeSpec {
        code: CONFIG_INVALID,
        kind: ErrorKind::Config,
        http_status: 500,
        grpc_status: grpc(13),
        retryable: RetryClass::None,
        severity: Severity::Critical,
        default_user_msg: "Service is misconfigured.",
    });

    add(CodeSpec {
        code: SCHEMA_VALIDATION,
        kind: ErrorKind::Schema,
        http_status: 422,
        grpc_status: grpc(3),
        retryable: RetryClass::Permanent,
        severity: Severity::Warn,
        default_user_msg: "Your request is invalid. Please check inputs.",
    });

    add(CodeSpec {
        code: UNKNOWN_INTERNAL,
        kind: ErrorKind::Unknown,
        http_status: 500,
        grpc_status: grpc(2),
        retryable: RetryClass::Transient,
        severity: Severity::Critical,
        default_user_msg: "Internal error. Please retry later.",
    });

    map
});

pub fn spec_of(code: ErrorCode) -> &'static CodeSpec {
    REGISTRY.get(code.0).expect("unregistered ErrorCode")
}
