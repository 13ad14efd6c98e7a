use axum::Json;
use serde::Serialize;

use kernel::prelude::entity::{Asset, AssetId, AssetKind, AssetLabel, DestructAsset};

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct AssetResponse {
    id: AssetId,
    kind: AssetKind,
    label: AssetLabel,
}

pub struct AssetPresenter;

impl Exhaust<Vec<Asset>> for AssetPresenter {
    type To = Json<Vec<AssetResponse>>;
    fn emit(&self, input: Vec<Asset>) -> Self::To {
        Json(
            input
                .into_iter()
                .map(|asset| {
                    let DestructAsset { id, kind, label } = asset.into_destruct();
                    AssetResponse { id, kind, label }
                })
                .collect(),
        )
    }
}
