use std::collections::{HashSet, VecDeque};

use error_stack::Report;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;
use vodca::{AsRefln, Fromln, References};

use crate::entity::{
    AssetId, AssetKind, FuelRefill, Kilometers, LoanDescription, LoanId, UserId, UserName,
};
use crate::KernelError;

#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct DraftId(Uuid);

impl DraftId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for DraftId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DraftKind {
    Checkout,
    Return,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, References)]
pub struct DraftItem {
    asset_id: AssetId,
    asset_kind: AssetKind,
    description: LoanDescription,
    loan_id: Option<LoanId>,
    baseline_km: Option<Kilometers>,
}

impl DraftItem {
    /// An asset about to be handed out. `current_km` is the vehicle's odometer.
    pub fn checkout(
        asset_id: AssetId,
        asset_kind: AssetKind,
        description: LoanDescription,
        current_km: Option<Kilometers>,
    ) -> Self {
        Self {
            asset_id,
            asset_kind,
            description,
            loan_id: None,
            baseline_km: current_km,
        }
    }

    /// An active loan about to be returned. `km_start` comes from its meta.
    pub fn returning(
        loan_id: LoanId,
        asset_id: AssetId,
        asset_kind: AssetKind,
        description: LoanDescription,
        km_start: Option<Kilometers>,
    ) -> Self {
        Self {
            asset_id,
            asset_kind,
            description,
            loan_id: Some(loan_id),
            baseline_km: km_start,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, References)]
pub struct MileageReading {
    asset_id: AssetId,
    km: Kilometers,
    fuel: Option<FuelRefill>,
    driver: Option<String>,
}

impl MileageReading {
    pub fn new(
        asset_id: AssetId,
        km: Kilometers,
        fuel: Option<FuelRefill>,
        driver: Option<String>,
    ) -> Self {
        Self {
            asset_id,
            km,
            fuel,
            driver,
        }
    }
}

/// The vehicle the operator has to enter mileage for next.
#[derive(Debug, Clone, PartialEq, References)]
pub struct MileagePrompt {
    asset_id: AssetId,
    description: LoanDescription,
    baseline_km: Option<Kilometers>,
    remaining: usize,
}

/// An uncommitted checkout or return. Vehicles are queued in item order and
/// each one needs a confirmed reading before the batch can be committed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, References)]
pub struct BatchDraft {
    id: DraftId,
    kind: DraftKind,
    operator_id: UserId,
    receiver_id: Option<UserId>,
    receiver_name: Option<UserName>,
    items: Vec<DraftItem>,
    queue: VecDeque<AssetId>,
    readings: Vec<MileageReading>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
}

impl BatchDraft {
    pub fn checkout(
        id: DraftId,
        operator_id: UserId,
        receiver_id: UserId,
        receiver_name: UserName,
        items: Vec<DraftItem>,
        created_at: OffsetDateTime,
    ) -> error_stack::Result<Self, KernelError> {
        if receiver_name.as_ref().trim().is_empty() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("Receiver name must not be empty"));
        }
        Self::build(
            id,
            DraftKind::Checkout,
            operator_id,
            Some(receiver_id),
            Some(receiver_name),
            items,
            created_at,
        )
    }

    pub fn returning(
        id: DraftId,
        operator_id: UserId,
        items: Vec<DraftItem>,
        created_at: OffsetDateTime,
    ) -> error_stack::Result<Self, KernelError> {
        if items.iter().any(|item| item.loan_id.is_none()) {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("Every returned item must reference a loan"));
        }
        Self::build(
            id,
            DraftKind::Return,
            operator_id,
            None,
            None,
            items,
            created_at,
        )
    }

    fn build(
        id: DraftId,
        kind: DraftKind,
        operator_id: UserId,
        receiver_id: Option<UserId>,
        receiver_name: Option<UserName>,
        items: Vec<DraftItem>,
        created_at: OffsetDateTime,
    ) -> error_stack::Result<Self, KernelError> {
        if items.is_empty() {
            return Err(
                Report::new(KernelError::Validation).attach_printable("Batch contains no items")
            );
        }
        let mut seen = HashSet::new();
        if let Some(duplicate) = items.iter().find(|item| !seen.insert(item.asset_id)) {
            return Err(Report::new(KernelError::Validation)
                .attach_printable(format!("Asset {} listed twice", duplicate.asset_id)));
        }
        let queue = items
            .iter()
            .filter(|item| item.asset_kind.is_vehicle())
            .map(|item| item.asset_id)
            .collect();
        Ok(Self {
            id,
            kind,
            operator_id,
            receiver_id,
            receiver_name,
            items,
            queue,
            readings: Vec::new(),
            created_at,
        })
    }

    pub fn next_prompt(&self) -> Option<MileagePrompt> {
        let head = self.queue.front()?;
        let item = self.item(head)?;
        Some(MileagePrompt {
            asset_id: item.asset_id,
            description: item.description.clone(),
            baseline_km: item.baseline_km,
            remaining: self.queue.len(),
        })
    }

    /// Accepts the reading for the vehicle at the head of the queue.
    pub fn submit(&mut self, reading: MileageReading) -> error_stack::Result<(), KernelError> {
        let Some(head) = self.queue.front().copied() else {
            return Err(Report::new(KernelError::InvalidTransition)
                .attach_printable("No mileage readings are outstanding"));
        };
        if reading.asset_id != head {
            return Err(Report::new(KernelError::Validation).attach_printable(format!(
                "Expected a reading for vehicle {head}, got {}",
                reading.asset_id
            )));
        }
        if reading.km.is_negative() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("Mileage must not be negative"));
        }
        if self.kind == DraftKind::Checkout && reading.fuel.is_some() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("Fuel refills are reported on return"));
        }
        if self.kind == DraftKind::Return {
            let baseline = self.item(&head).and_then(|item| item.baseline_km);
            if let Some(km_start) = baseline.filter(|km_start| &reading.km < km_start) {
                return Err(Report::new(KernelError::Validation).attach_printable(format!(
                    "Final mileage {} is below starting mileage {}",
                    reading.km, km_start
                )));
            }
        }
        self.queue.pop_front();
        self.readings.push(reading);
        Ok(())
    }

    pub fn is_ready(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn reading_for(&self, asset_id: &AssetId) -> Option<&MileageReading> {
        self.readings
            .iter()
            .find(|reading| &reading.asset_id == asset_id)
    }

    fn item(&self, asset_id: &AssetId) -> Option<&DraftItem> {
        self.items.iter().find(|item| &item.asset_id == asset_id)
    }
}
