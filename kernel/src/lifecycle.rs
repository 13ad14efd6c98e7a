use destructure::Destructure;
use error_stack::Report;
use vodca::References;

use crate::command::LoanCommand;
use crate::entity::{AuditContext, EventVersion, LoanId, LoanRecord};
use crate::event::{Applier, AuditEntry, EventInfo, LoanEvent};
use crate::signature::AuditSigner;
use crate::KernelError;

/// Result of running one command against a record: the state before, the
/// state after (`None` once cancelled) and the signed audit entry.
#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct Transition {
    previous: Option<LoanRecord>,
    next: Option<LoanRecord>,
    entry: AuditEntry,
}

pub fn transition(
    current: Option<LoanRecord>,
    command: LoanCommand,
    context: &AuditContext,
    signer: &impl AuditSigner,
) -> error_stack::Result<Transition, KernelError> {
    let loan_id = match (&current, &command) {
        (Some(record), _) => *record.id(),
        (None, LoanCommand::Request { id, .. }) => *id,
        (None, _) => {
            return Err(Report::new(KernelError::NotFound).attach_printable("Loan does not exist"))
        }
    };
    let event = LoanEvent::decide(current.as_ref(), command, context)?;
    let version = current
        .as_ref()
        .map_or(EventVersion::Nothing, |record| record.version().clone())
        .next();
    let message = event.describe(current.as_ref(), context);
    let entry = AuditEntry::signed(
        loan_id,
        version.clone(),
        event.clone(),
        message,
        context,
        signer,
    );

    let mut next = current.clone();
    next.apply(EventInfo::<LoanEvent, LoanRecord>::new(
        event,
        version,
        context.ip().clone(),
        entry.signature().clone(),
    ));
    Ok(Transition {
        previous: current,
        next,
        entry,
    })
}

impl Transition {
    pub fn loan_id(&self) -> &LoanId {
        self.entry.loan_id()
    }
}
