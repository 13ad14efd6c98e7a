use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct AssetLabel(String);

impl AssetLabel {
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }
}
