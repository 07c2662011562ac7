use crate::errors::{self, AuthError};
use crate::model::{Claims, TokenPair};
use chrono::Utc;
use gatebase_types::prelude::*;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;

/// Signing secrets below this length are refused outright; a guessable key
/// lets anyone mint credentials.
pub const MIN_SECRET_LEN: usize = 64;

/// Issues and validates signed bearer tokens. Configuration is injected once
/// at construction and immutable afterwards, so a codec can be shared across
/// calls without synchronization.
#[derive(Debug)]
pub struct TokenCodec {
    secret: String,
    access_ttl: Duration,
    refresh_ttl: Duration,
    issuer: String,
    validation: Validation,
}

impl TokenCodec {
    pub fn new(
        secret: impl Into<String>,
        access_ttl: Duration,
        refresh_ttl: Duration,
        issuer: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let secret = secret.into();
        if secret.is_empty() {
            return Err(errors::config_invalid(
                "signing secret is not set; generate one with: openssl rand -base64 64",
            ));
        }
        if secret.len() < MIN_SECRET_LEN {
            return Err(errors::config_invalid(&format!(
                "signing secret must be at least {MIN_SECRET_LEN} characters, got {}",
                secret.len()
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;

        Ok(Self {
            secret,
            access_ttl,
            refresh_ttl,
            issuer: issuer.into(),
            validation,
        })
    }

    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    pub fn refresh_ttl(&self) -> Duration {
        self.refresh_ttl
    }

    pub fn issue_access(&self, sub: &str, email: &str) -> Result<String, AuthError> {
        self.issue_with_role(sub, email, Role::None, self.access_ttl)
    }

    pub fn issue_refresh(&self, sub: &str, email: &str) -> Result<String, AuthError> {
        self.issue_with_role(sub, email, Role::None, self.refresh_ttl)
    }

    pub fn issue_admin_access(&self, sub: &str, email: &str) -> Result<String, AuthError> {
        self.issue_with_role(sub, email, Role::Admin, self.access_ttl)
    }

    pub fn issue_admin_refresh(&self, sub: &str, email: &str) -> Result<String, AuthError> {
        self.issue_with_role(sub, email, Role::Admin, self.refresh_ttl)
    }

    pub fn issue_pair(&self, sub: &str, email: &str) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.issue_access(sub, email)?,
            refresh_token: self.issue_refresh(sub, email)?,
        })
    }

    pub fn issue_admin_pair(&self, sub: &str, email: &str) -> Result<TokenPair, AuthError> {
        Ok(TokenPair {
            access_token: self.issue_admin_access(sub, email)?,
            refresh_token: self.issue_admin_refresh(sub, email)?,
        })
    }

    /// Verifies signature, algorithm, expiry, and not-before. Callers only
    /// ever see the stable expired / not-yet-valid / invalid split; finer
    /// failure detail stays in the dev message.
    pub fn validate(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &self.validation,
        )
        .map_err(|err| match err.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => errors::credential_expired(),
            jsonwebtoken::errors::ErrorKind::ImmatureSignature => {
                errors::credential_not_yet_valid()
            }
            _ => errors::invalid_credential(&format!("token rejected: {err}")),
        })?;
        Ok(data.claims)
    }

    /// Validates a refresh token and mints a fresh access token for the same
    /// subject, carrying the role over.
    pub fn refresh_access(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self.validate(refresh_token)?;
        self.issue_with_role(&claims.sub, &claims.email, claims.role, self.access_ttl)
    }

    pub fn subject_of(&self, token: &str) -> Result<Subject, AuthError> {
        Ok(self.validate(token)?.subject())
    }

    fn issue_with_role(
        &self,
        sub: &str,
        email: &str,
        role: Role,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: sub.to_string(),
            email: email.to_string(),
            role,
            iss: self.issuer.clone(),
            iat: now,
            nbf: now,
            exp: now + ttl.as_secs() as i64,
        };

        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|err| errors::internal(&format!("token encoding failed: {err}")))
    }
}
