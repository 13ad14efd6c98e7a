use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct LoanDescription(String);

impl LoanDescription {
    pub fn new(description: impl Into<String>) -> Self {
        Self(description.into())
    }
}

impl std::fmt::Display for LoanDescription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
