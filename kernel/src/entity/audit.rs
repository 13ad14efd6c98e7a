use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use vodca::{AsRefln, Fromln, References};

use crate::entity::Actor;
use crate::KernelError;

/// Address the request originated from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct ClientIp(String);

impl ClientIp {
    pub fn new(ip: impl Into<String>) -> Self {
        Self(ip.into())
    }
}

/// Hex encoded keyed hash over an audit entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Fromln, AsRefln, Serialize, Deserialize)]
pub struct SignatureHash(String);

impl SignatureHash {
    pub fn new(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Fromln, AsRefln, Serialize, Deserialize)]
pub struct AuditMessage(String);

impl AuditMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl Display for AuditMessage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Who did what from where, attached to every lifecycle command.
#[derive(Debug, Clone, PartialEq, Eq, References)]
pub struct AuditContext {
    actor: Actor,
    ip: Option<ClientIp>,
    at: OffsetDateTime,
}

impl AuditContext {
    pub fn new(actor: Actor, ip: Option<ClientIp>, at: OffsetDateTime) -> Self {
        Self { actor, ip, at }
    }
}

const REQUESTED: &str = "REQUESTED";
const CONFIRMED: &str = "CONFIRMED";
const REJECTED: &str = "REJECTED";
const CANCELLED: &str = "CANCELLED";
const RETURNED: &str = "RETURNED";
const HANDOVER_REQUESTED: &str = "HANDOVER_REQUESTED";
const HANDOVER_ACCEPTED: &str = "HANDOVER_ACCEPTED";
const HANDOVER_DECLINED: &str = "HANDOVER_DECLINED";

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LoanAction {
    Requested,
    Confirmed,
    Rejected,
    Cancelled,
    Returned,
    HandoverRequested,
    HandoverAccepted,
    HandoverDeclined,
}

impl LoanAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanAction::Requested => REQUESTED,
            LoanAction::Confirmed => CONFIRMED,
            LoanAction::Rejected => REJECTED,
            LoanAction::Cancelled => CANCELLED,
            LoanAction::Returned => RETURNED,
            LoanAction::HandoverRequested => HANDOVER_REQUESTED,
            LoanAction::HandoverAccepted => HANDOVER_ACCEPTED,
            LoanAction::HandoverDeclined => HANDOVER_DECLINED,
        }
    }
}

impl Display for LoanAction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanAction {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            REQUESTED => Ok(LoanAction::Requested),
            CONFIRMED => Ok(LoanAction::Confirmed),
            REJECTED => Ok(LoanAction::Rejected),
            CANCELLED => Ok(LoanAction::Cancelled),
            RETURNED => Ok(LoanAction::Returned),
            HANDOVER_REQUESTED => Ok(LoanAction::HandoverRequested),
            HANDOVER_ACCEPTED => Ok(LoanAction::HandoverAccepted),
            HANDOVER_DECLINED => Ok(LoanAction::HandoverDeclined),
            _ => Err(Report::new(KernelError::Internal)
                .attach_printable(format!("Unknown loan action: {s}"))),
        }
    }
}
