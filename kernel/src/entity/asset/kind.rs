use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

const VEHICLE: &str = "VEHICLE";
const VEST: &str = "VEST";
const RADIO: &str = "RADIO";
const EQUIPMENT: &str = "EQUIPMENT";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssetKind {
    Vehicle,
    Vest,
    Radio,
    Equipment,
}

impl AssetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetKind::Vehicle => VEHICLE,
            AssetKind::Vest => VEST,
            AssetKind::Radio => RADIO,
            AssetKind::Equipment => EQUIPMENT,
        }
    }

    pub fn is_vehicle(&self) -> bool {
        matches!(self, AssetKind::Vehicle)
    }
}

impl Display for AssetKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AssetKind {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            VEHICLE => Ok(AssetKind::Vehicle),
            VEST => Ok(AssetKind::Vest),
            RADIO => Ok(AssetKind::Radio),
            EQUIPMENT => Ok(AssetKind::Equipment),
            _ => Err(Report::new(KernelError::Validation)
                .attach_printable(format!("Unknown asset type: {s}"))),
        }
    }
}
