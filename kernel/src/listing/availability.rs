use std::collections::HashSet;

use crate::entity::{Asset, AssetId, AssetKind, LoanRecord};

/// Assets with no pending or active loan, optionally of a single kind.
pub fn available_assets<'a>(
    assets: impl IntoIterator<Item = Asset>,
    loans: impl IntoIterator<Item = &'a LoanRecord>,
    kind: Option<AssetKind>,
) -> Vec<Asset> {
    let taken = loans
        .into_iter()
        .filter(|loan| loan.status().is_open())
        .map(|loan| *loan.asset_id())
        .collect::<HashSet<AssetId>>();
    assets
        .into_iter()
        .filter(|asset| kind.map_or(true, |kind| asset.kind() == &kind))
        .filter(|asset| !taken.contains(asset.id()))
        .collect()
}
