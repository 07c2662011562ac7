use gatebase_types::prelude::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Signed bearer-token claims. Immutable once issued; `role` is omitted on
/// the wire for regular callers.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Role::is_none")]
    pub role: Role,
    pub iss: String,
    pub iat: i64,
    pub nbf: i64,
    pub exp: i64,
}

impl Claims {
    pub fn subject(&self) -> Subject {
        Subject {
            kind: SubjectKind::User,
            subject_id: Id(self.sub.clone()),
            display: self.email.clone(),
            role: self.role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateOutcome {
    Admitted,
    Rejected { capacity: u32, window: Duration },
}
