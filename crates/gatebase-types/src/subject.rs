use crate::{id::Id, role::Role};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectKind {
    User,
    Service,
}

/// Authenticated caller identity as attached to a call context.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Subject {
    pub kind: SubjectKind,
    pub subject_id: Id,
    pub display: String,
    #[serde(default)]
    pub role: Role,
}
