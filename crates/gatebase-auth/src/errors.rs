use gatebase_errors::prelude::*;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{0:?}")]
pub struct AuthError(pub ErrorObj);

impl AuthError {
    pub fn into_inner(self) -> ErrorObj {
        self.0
    }

    pub fn code(&self) -> ErrorCode {
        self.0.code
    }
}

pub fn config_invalid(msg: &str) -> AuthError {
    AuthError(
        ErrorBuilder::new(codes::CONFIG_INVALID)
            .user_msg("Service is misconfigured.")
            .dev_msg(msg)
            .build(),
    )
}

pub fn invalid_credential(msg: &str) -> AuthError {
    AuthError(
        ErrorBuilder::new(codes::AUTH_INVALID_CREDENTIAL)
            .user_msg("Invalid credential.")
            .dev_msg(msg)
            .build(),
    )
}

pub fn credential_expired() -> AuthError {
    AuthError(
        ErrorBuilder::new(codes::AUTH_CREDENTIAL_EXPIRED)
            .user_msg("Credential has expired. Please sign in again.")
            .build(),
    )
}

pub fn credential_not_yet_valid() -> AuthError {
    AuthError(
        ErrorBuilder::new(codes::AUTH_CREDENTIAL_NOT_YET_VALID)
            .user_msg("Credential is not valid yet.")
            .build(),
    )
}

pub fn internal(msg: &str) -> AuthError {
    AuthError(
        ErrorBuilder::new(codes::UNKNOWN_INTERNAL)
            .user_msg("Internal error. Please retry later.")
            .dev_msg(msg)
            .build(),
    )
}
