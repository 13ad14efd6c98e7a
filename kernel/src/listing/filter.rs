use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::entity::{Actor, AssetId, DateRange, LoanRecord, RegistrationNumber};
use crate::listing::SearchTerm;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoanTab {
    /// Pending and active loans.
    #[default]
    Active,
    /// Completed and rejected loans.
    History,
}

impl LoanTab {
    pub fn includes(&self, record: &LoanRecord) -> bool {
        match self {
            LoanTab::Active => record.status().is_open(),
            LoanTab::History => !record.status().is_open(),
        }
    }

    /// The time a record is ranged and ordered by on this tab.
    pub fn time_of(&self, record: &LoanRecord) -> OffsetDateTime {
        let checkout = *record.checkout_time().as_ref();
        match self {
            LoanTab::Active => checkout,
            LoanTab::History => record
                .return_time()
                .map_or(checkout, |returned| *returned.as_ref()),
        }
    }
}

/// Vehicle registration numbers keyed by asset, used by search.
pub type Registrations = HashMap<AssetId, RegistrationNumber>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoanFilter {
    tab: LoanTab,
    search: SearchTerm,
    range: DateRange,
}

impl LoanFilter {
    pub fn new(tab: LoanTab, search: SearchTerm, range: DateRange) -> Self {
        Self { tab, search, range }
    }

    pub fn tab(&self) -> LoanTab {
        self.tab
    }

    pub fn range(&self) -> &DateRange {
        &self.range
    }

    pub fn visible_to(actor: &Actor, record: &LoanRecord) -> bool {
        actor.is_manager() || record.involves(actor.id())
    }

    fn matches_search(&self, record: &LoanRecord, registrations: &Registrations) -> bool {
        if self.search.is_empty() {
            return true;
        }
        self.search.matches(record.receiver_name().as_ref())
            || self.search.matches(record.description().as_ref())
            || record
                .meta()
                .driver
                .as_deref()
                .is_some_and(|driver| self.search.matches(driver))
            || registrations
                .get(record.asset_id())
                .is_some_and(|registration| self.search.matches(registration.as_ref()))
    }

    pub fn matches(&self, record: &LoanRecord, registrations: &Registrations) -> bool {
        self.tab.includes(record)
            && self.range.contains(self.tab.time_of(record))
            && self.matches_search(record, registrations)
    }

    /// Keeps the records `actor` may see that pass every criterion.
    pub fn apply(
        &self,
        actor: &Actor,
        records: impl IntoIterator<Item = LoanRecord>,
        registrations: &Registrations,
    ) -> Vec<LoanRecord> {
        records
            .into_iter()
            .filter(|record| Self::visible_to(actor, record))
            .filter(|record| self.matches(record, registrations))
            .collect()
    }
}
