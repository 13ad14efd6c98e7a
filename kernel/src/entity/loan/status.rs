use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

const PENDING: &str = "PENDING";
const ACTIVE: &str = "ACTIVE";
const COMPLETED: &str = "COMPLETED";
const REJECTED: &str = "REJECTED";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanStatus {
    Pending,
    Active,
    Completed,
    Rejected,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => PENDING,
            LoanStatus::Active => ACTIVE,
            LoanStatus::Completed => COMPLETED,
            LoanStatus::Rejected => REJECTED,
        }
    }

    /// Open loans keep their asset unavailable.
    pub fn is_open(&self) -> bool {
        matches!(self, LoanStatus::Pending | LoanStatus::Active)
    }
}

impl Display for LoanStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            PENDING => Ok(LoanStatus::Pending),
            ACTIVE => Ok(LoanStatus::Active),
            COMPLETED => Ok(LoanStatus::Completed),
            REJECTED => Ok(LoanStatus::Rejected),
            _ => Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Unknown loan status: {s}"))),
        }
    }
}
