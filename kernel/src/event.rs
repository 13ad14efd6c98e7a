mod audit;
mod loan;

pub use self::{audit::*, loan::*};
use crate::entity::{ClientIp, EventVersion, SignatureHash};
use destructure::Destructure;
use vodca::References;

/// An event together with the stamps it leaves on the entity.
#[derive(Debug, Clone, PartialEq, References, Destructure)]
pub struct EventInfo<Event, Entity> {
    event: Event,
    version: EventVersion<Entity>,
    ip: Option<ClientIp>,
    signature: SignatureHash,
}

impl<Event, Entity> EventInfo<Event, Entity> {
    pub fn new(
        event: Event,
        version: EventVersion<Entity>,
        ip: Option<ClientIp>,
        signature: SignatureHash,
    ) -> Self {
        Self {
            event,
            version,
            ip,
            signature,
        }
    }
}

pub trait Applier<T> {
    fn apply(&mut self, event: T);
}
