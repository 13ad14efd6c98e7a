mod km;
mod registration;

pub use self::{km::*, registration::*};
use crate::entity::AssetId;
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct Vehicle {
    id: AssetId,
    registration: RegistrationNumber,
    current_km: Kilometers,
}

impl Vehicle {
    pub fn new(id: AssetId, registration: RegistrationNumber, current_km: Kilometers) -> Self {
        Self {
            id,
            registration,
            current_km,
        }
    }
}
