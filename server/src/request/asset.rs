use serde::Deserialize;

use application::transfer::GetAvailableAssetDto;
use kernel::prelude::entity::AssetKind;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct GetAvailableAssetRequest {
    #[serde(default)]
    kind: Option<AssetKind>,
}

pub struct AssetTransformer;

impl Intake<GetAvailableAssetRequest> for AssetTransformer {
    type To = GetAvailableAssetDto;
    fn emit(&self, input: GetAvailableAssetRequest) -> Self::To {
        GetAvailableAssetDto { kind: input.kind }
    }
}
