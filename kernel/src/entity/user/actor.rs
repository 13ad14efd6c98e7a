use serde::{Deserialize, Serialize};
use vodca::References;

use crate::entity::{UserId, UserName};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActorRole {
    Member,
    Manager,
}

/// The authenticated user performing a request.
#[derive(Debug, Clone, Eq, PartialEq, References)]
pub struct Actor {
    id: UserId,
    name: UserName,
    role: ActorRole,
}

impl Actor {
    pub fn new(id: UserId, name: UserName, role: ActorRole) -> Self {
        Self { id, name, role }
    }

    pub fn is_manager(&self) -> bool {
        self.role == ActorRole::Manager
    }

    /// Managers may act on any record, everyone else only on their own.
    pub fn is_or_manages(&self, user: &UserId) -> bool {
        self.is_manager() || &self.id == user
    }
}
