use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::entity::{Kilometers, UserId, UserName};

/// Free-form details attached to a loan, stored as camelCase JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LoanMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub km_start: Option<Kilometers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub km_end: Option<Kilometers>,
    pub fuel_refill: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_liters: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fuel_km: Option<Kilometers>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coupon_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_handover_to_user_id: Option<UserId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_handover_to_name: Option<UserName>,
    pub handover_history: Vec<HandoverEntry>,
}

impl LoanMeta {
    pub fn record_fuel(&mut self, fuel: &FuelRefill) {
        self.fuel_refill = true;
        self.fuel_liters = Some(fuel.liters);
        self.fuel_type = fuel.fuel_type.clone();
        self.fuel_km = fuel.km;
        self.coupon_number = fuel.coupon_number.clone();
        self.supplier = fuel.supplier.clone();
    }

    pub fn has_pending_handover(&self) -> bool {
        self.pending_handover_to_user_id.is_some()
    }

    pub fn clear_pending_handover(&mut self) {
        self.pending_handover_to_user_id = None;
        self.pending_handover_to_name = None;
    }
}

/// Refuelling done during the loan, reported on return.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FuelRefill {
    pub liters: f64,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub km: Option<Kilometers>,
    #[serde(default)]
    pub coupon_number: Option<String>,
    #[serde(default)]
    pub supplier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandoverEntry {
    pub from_user_id: UserId,
    pub from_name: UserName,
    pub to_user_id: UserId,
    pub to_name: UserName,
    #[serde(with = "time::serde::rfc3339")]
    pub accepted_at: OffsetDateTime,
}
