use serde::{Deserialize, Serialize};

/// Caller role carried inside signed claims. `None` is omitted on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    None,
    Admin,
}

impl Role {
    pub const fn as_str(self) -> &'static str {
        match self {
            Role::None => "none",
            Role::Admin => "admin",
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Role::None)
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}
