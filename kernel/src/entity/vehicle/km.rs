use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

/// Odometer reading in whole kilometres.
#[derive(
    Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Fromln, AsRefln, Serialize, Deserialize,
)]
pub struct Kilometers(i64);

impl Kilometers {
    pub fn new(km: impl Into<i64>) -> Self {
        Self(km.into())
    }

    pub fn is_negative(&self) -> bool {
        self.0 < 0
    }
}

impl Display for Kilometers {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} km", self.0)
    }
}
