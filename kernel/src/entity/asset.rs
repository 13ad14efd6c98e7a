mod id;
mod kind;
mod label;

pub use self::{id::*, kind::*, label::*};
use destructure::Destructure;
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct Asset {
    id: AssetId,
    kind: AssetKind,
    label: AssetLabel,
}

impl Asset {
    pub fn new(id: AssetId, kind: AssetKind, label: AssetLabel) -> Self {
        Self { id, kind, label }
    }
}
