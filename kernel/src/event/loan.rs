use error_stack::Report;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::command::LoanCommand;
use crate::entity::{
    Actor, AssetId, AssetKind, AuditContext, AuditMessage, BatchId, CheckoutTime, FuelRefill,
    HandoverEntry, Kilometers, LoanAction, LoanDescription, LoanId, LoanMeta, LoanRecord,
    LoanStatus, ReturnedAt, UserId, UserName,
};
use crate::event::{Applier, DestructEventInfo, EventInfo};
use crate::KernelError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum LoanEvent {
    Requested {
        id: LoanId,
        batch_id: BatchId,
        operator_id: UserId,
        receiver_id: UserId,
        receiver_name: UserName,
        asset_kind: AssetKind,
        asset_id: AssetId,
        description: LoanDescription,
        km_start: Option<Kilometers>,
        driver: Option<String>,
        #[serde(with = "time::serde::rfc3339")]
        at: OffsetDateTime,
    },
    Confirmed,
    Rejected {
        #[serde(with = "time::serde::rfc3339")]
        at: OffsetDateTime,
    },
    Cancelled,
    Returned {
        #[serde(with = "time::serde::rfc3339")]
        at: OffsetDateTime,
        km_end: Option<Kilometers>,
        fuel: Option<FuelRefill>,
    },
    HandoverRequested {
        to_user_id: UserId,
        to_name: UserName,
    },
    HandoverAccepted {
        #[serde(with = "time::serde::rfc3339")]
        at: OffsetDateTime,
    },
    HandoverDeclined,
}

fn require_status(record: &LoanRecord, expected: LoanStatus) -> error_stack::Result<(), KernelError> {
    if record.status() == &expected {
        Ok(())
    } else {
        Err(
            Report::new(KernelError::InvalidTransition).attach_printable(format!(
                "Loan {} is {}, expected {}",
                record.id(),
                record.status(),
                expected
            )),
        )
    }
}

fn require_party(actor: &Actor, parties: &[&UserId]) -> error_stack::Result<(), KernelError> {
    if actor.is_manager() || parties.contains(&actor.id()) {
        Ok(())
    } else {
        Err(Report::new(KernelError::Forbidden)
            .attach_printable(format!("User {} is not part of this loan", actor.id())))
    }
}

fn validation(message: impl Into<String>) -> Report<KernelError> {
    Report::new(KernelError::Validation).attach_printable(message.into())
}

impl LoanEvent {
    pub fn action(&self) -> LoanAction {
        match self {
            LoanEvent::Requested { .. } => LoanAction::Requested,
            LoanEvent::Confirmed => LoanAction::Confirmed,
            LoanEvent::Rejected { .. } => LoanAction::Rejected,
            LoanEvent::Cancelled => LoanAction::Cancelled,
            LoanEvent::Returned { .. } => LoanAction::Returned,
            LoanEvent::HandoverRequested { .. } => LoanAction::HandoverRequested,
            LoanEvent::HandoverAccepted { .. } => LoanAction::HandoverAccepted,
            LoanEvent::HandoverDeclined => LoanAction::HandoverDeclined,
        }
    }

    /// Checks `command` against the current state of the record and the
    /// acting user, producing the event to apply.
    pub fn decide(
        current: Option<&LoanRecord>,
        command: LoanCommand,
        context: &AuditContext,
    ) -> error_stack::Result<Self, KernelError> {
        let actor = context.actor();
        match (current, command) {
            (Some(record), LoanCommand::Request { .. }) => {
                Err(Report::new(KernelError::InvalidTransition)
                    .attach_printable(format!("Loan {} already exists", record.id())))
            }
            (
                None,
                LoanCommand::Request {
                    id,
                    batch_id,
                    receiver_id,
                    receiver_name,
                    asset_kind,
                    asset_id,
                    description,
                    km_start,
                    driver,
                },
            ) => {
                if description.as_ref().trim().is_empty() {
                    return Err(validation("Description must not be empty"));
                }
                if receiver_name.as_ref().trim().is_empty() {
                    return Err(validation("Receiver name must not be empty"));
                }
                match (asset_kind.is_vehicle(), km_start) {
                    (true, None) => {
                        return Err(validation("Vehicle checkout requires starting mileage"))
                    }
                    (true, Some(km)) if km.is_negative() => {
                        return Err(validation("Mileage must not be negative"))
                    }
                    (false, Some(_)) => {
                        return Err(validation("Mileage only applies to vehicles"))
                    }
                    _ => {}
                }
                Ok(LoanEvent::Requested {
                    id,
                    batch_id,
                    operator_id: *actor.id(),
                    receiver_id,
                    receiver_name,
                    asset_kind,
                    asset_id,
                    description,
                    km_start,
                    driver,
                    at: *context.at(),
                })
            }
            (None, _) => {
                Err(Report::new(KernelError::NotFound).attach_printable("Loan does not exist"))
            }
            (Some(record), LoanCommand::Confirm) => {
                require_status(record, LoanStatus::Pending)?;
                require_party(actor, &[record.receiver_id()])?;
                Ok(LoanEvent::Confirmed)
            }
            (Some(record), LoanCommand::Reject) => {
                require_status(record, LoanStatus::Pending)?;
                require_party(actor, &[record.receiver_id()])?;
                Ok(LoanEvent::Rejected { at: *context.at() })
            }
            (Some(record), LoanCommand::Cancel) => {
                require_status(record, LoanStatus::Pending)?;
                require_party(actor, &[record.operator_id()])?;
                Ok(LoanEvent::Cancelled)
            }
            (Some(record), LoanCommand::Return { km_end, fuel }) => {
                require_status(record, LoanStatus::Active)?;
                require_party(actor, &[record.operator_id(), record.receiver_id()])?;
                if record.asset_kind().is_vehicle() {
                    let Some(km_end) = km_end else {
                        return Err(validation("Vehicle return requires final mileage"));
                    };
                    if let Some(km_start) = record.meta().km_start {
                        if km_end < km_start {
                            return Err(validation(format!(
                                "Final mileage {km_end} is below starting mileage {km_start}"
                            )));
                        }
                    }
                } else if km_end.is_some() || fuel.is_some() {
                    return Err(validation("Mileage and fuel only apply to vehicles"));
                }
                if let Some(fuel) = &fuel {
                    if fuel.liters <= 0.0 || !fuel.liters.is_finite() {
                        return Err(validation("Refuelled amount must be positive"));
                    }
                }
                Ok(LoanEvent::Returned {
                    at: *context.at(),
                    km_end,
                    fuel,
                })
            }
            (
                Some(record),
                LoanCommand::RequestHandover {
                    to_user_id,
                    to_name,
                },
            ) => {
                require_status(record, LoanStatus::Active)?;
                require_party(actor, &[record.receiver_id()])?;
                if !record.asset_kind().is_vehicle() {
                    return Err(Report::new(KernelError::InvalidTransition)
                        .attach_printable("Only vehicle loans can be handed over"));
                }
                if record.meta().has_pending_handover() {
                    return Err(Report::new(KernelError::InvalidTransition)
                        .attach_printable("A handover is already pending"));
                }
                if &to_user_id == record.receiver_id() {
                    return Err(validation("Vehicle is already held by this user"));
                }
                if to_name.as_ref().trim().is_empty() {
                    return Err(validation("Handover target name must not be empty"));
                }
                Ok(LoanEvent::HandoverRequested {
                    to_user_id,
                    to_name,
                })
            }
            (Some(record), command @ (LoanCommand::AcceptHandover | LoanCommand::DeclineHandover)) => {
                require_status(record, LoanStatus::Active)?;
                let Some(target) = record.meta().pending_handover_to_user_id.as_ref() else {
                    return Err(Report::new(KernelError::InvalidTransition)
                        .attach_printable("No handover is pending"));
                };
                require_party(actor, &[target])?;
                match command {
                    LoanCommand::AcceptHandover => Ok(LoanEvent::HandoverAccepted {
                        at: *context.at(),
                    }),
                    _ => Ok(LoanEvent::HandoverDeclined),
                }
            }
        }
    }

    /// Human readable log line for the audit trail.
    pub fn describe(&self, current: Option<&LoanRecord>, context: &AuditContext) -> AuditMessage {
        let actor = context.actor().name();
        let subject = current
            .map(|record| format!("{} '{}'", record.asset_kind(), record.description()))
            .unwrap_or_default();
        let holder = current
            .map(|record| record.receiver_name().to_string())
            .unwrap_or_default();
        let message = match self {
            LoanEvent::Requested {
                asset_kind,
                description,
                receiver_name,
                km_start,
                ..
            } => {
                let mut message =
                    format!("{actor} handed out {asset_kind} '{description}' to {receiver_name}");
                if let Some(km) = km_start {
                    message.push_str(&format!(" at {km}"));
                }
                message
            }
            LoanEvent::Confirmed => format!("{actor} confirmed receipt of {subject}"),
            LoanEvent::Rejected { .. } => format!("{actor} refused {subject}"),
            LoanEvent::Cancelled => {
                format!("{actor} cancelled pending loan of {subject} to {holder}")
            }
            LoanEvent::Returned { km_end, fuel, .. } => {
                let mut message = format!("{actor} took back {subject} from {holder}");
                let km_start = current.and_then(|record| record.meta().km_start);
                match (km_start, km_end) {
                    (Some(start), Some(end)) => message.push_str(&format!(", mileage {start} -> {end}")),
                    (None, Some(end)) => message.push_str(&format!(", mileage {end}")),
                    _ => {}
                }
                if let Some(fuel) = fuel {
                    message.push_str(&format!(", refuelled {} l", fuel.liters));
                }
                message
            }
            LoanEvent::HandoverRequested { to_name, .. } => {
                format!("{actor} requested handover of {subject} from {holder} to {to_name}")
            }
            LoanEvent::HandoverAccepted { .. } => {
                format!("{actor} accepted handover of {subject} from {holder}")
            }
            LoanEvent::HandoverDeclined => format!("{actor} declined handover of {subject}"),
        };
        AuditMessage::new(message)
    }
}

impl Applier<EventInfo<LoanEvent, LoanRecord>> for Option<LoanRecord> {
    fn apply(&mut self, event: EventInfo<LoanEvent, LoanRecord>) {
        let DestructEventInfo {
            event,
            version,
            ip,
            signature,
        } = event.into_destruct();
        match (self, event) {
            (
                option @ None,
                LoanEvent::Requested {
                    id,
                    batch_id,
                    operator_id,
                    receiver_id,
                    receiver_name,
                    asset_kind,
                    asset_id,
                    description,
                    km_start,
                    driver,
                    at,
                },
            ) => {
                let meta = LoanMeta {
                    km_start,
                    driver,
                    ..LoanMeta::default()
                };
                *option = Some(LoanRecord::new(
                    id,
                    batch_id,
                    operator_id,
                    receiver_id,
                    receiver_name,
                    asset_kind,
                    asset_id,
                    description,
                    CheckoutTime::new(at),
                    None,
                    LoanStatus::Pending,
                    meta,
                    ip.clone(),
                    ip,
                    signature,
                    version,
                ));
            }
            (option, LoanEvent::Cancelled) => {
                *option = None;
            }
            (Some(record), event) => record.substitute(|record| {
                match event {
                    LoanEvent::Confirmed => {
                        *record.status = LoanStatus::Active;
                    }
                    LoanEvent::Rejected { at } => {
                        *record.status = LoanStatus::Rejected;
                        *record.return_time = Some(ReturnedAt::new(at));
                    }
                    LoanEvent::Returned { at, km_end, fuel } => {
                        *record.status = LoanStatus::Completed;
                        *record.return_time = Some(ReturnedAt::new(at));
                        record.meta.km_end = km_end;
                        if let Some(fuel) = &fuel {
                            record.meta.record_fuel(fuel);
                        }
                        record.meta.clear_pending_handover();
                    }
                    LoanEvent::HandoverRequested {
                        to_user_id,
                        to_name,
                    } => {
                        record.meta.pending_handover_to_user_id = Some(to_user_id);
                        record.meta.pending_handover_to_name = Some(to_name);
                    }
                    LoanEvent::HandoverAccepted { at } => {
                        let target = record.meta.pending_handover_to_user_id.take();
                        let target_name = record.meta.pending_handover_to_name.take();
                        if let (Some(to_user_id), Some(to_name)) = (target, target_name) {
                            record.meta.handover_history.push(HandoverEntry {
                                from_user_id: *record.receiver_id,
                                from_name: record.receiver_name.clone(),
                                to_user_id,
                                to_name: to_name.clone(),
                                accepted_at: at,
                            });
                            *record.receiver_id = to_user_id;
                            *record.receiver_name = to_name;
                        }
                    }
                    LoanEvent::HandoverDeclined => {
                        record.meta.clear_pending_handover();
                    }
                    LoanEvent::Requested { .. } | LoanEvent::Cancelled => {}
                }
                *record.updated_ip = ip;
                *record.signature = signature;
                *record.version = version;
            }),
            _ => {}
        }
    }
}
