use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::entity::LoanRecord;
use crate::listing::LoanTab;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupBy {
    #[default]
    Receiver,
    Batch,
}

impl GroupBy {
    fn key(&self, record: &LoanRecord) -> Uuid {
        match self {
            GroupBy::Receiver => *record.receiver_id().as_ref(),
            GroupBy::Batch => *record.batch_id().as_ref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LoanGroup {
    pub key: Uuid,
    pub title: String,
    pub latest: OffsetDateTime,
    pub records: Vec<LoanRecord>,
}

/// Buckets `records` by receiver or batch. Records inside a group and the
/// groups themselves come most recent first, by the tab's time.
pub fn group(records: Vec<LoanRecord>, by: GroupBy, tab: LoanTab) -> Vec<LoanGroup> {
    let mut buckets: HashMap<Uuid, Vec<LoanRecord>> = HashMap::new();
    for record in records {
        buckets.entry(by.key(&record)).or_default().push(record);
    }
    let mut groups = buckets
        .into_iter()
        .filter_map(|(key, mut records)| {
            records.sort_by_key(|record| std::cmp::Reverse(tab.time_of(record)));
            let head = records.first()?;
            let latest = tab.time_of(head);
            let title = match by {
                GroupBy::Receiver => head.receiver_name().to_string(),
                GroupBy::Batch => format!(
                    "{} ({})",
                    head.receiver_name(),
                    records.len()
                ),
            };
            Some(LoanGroup {
                key,
                title,
                latest,
                records,
            })
        })
        .collect::<Vec<_>>();
    groups.sort_by(|a, b| b.latest.cmp(&a.latest).then_with(|| a.key.cmp(&b.key)));
    groups
}
