pub use crate::{
    id::{CorrelationId, Id},
    role::Role,
    subject::{Subject, SubjectKind},
};
