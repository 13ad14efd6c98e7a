use kernel::prelude::entity::AssetKind;

pub struct GetAvailableAssetDto {
    pub kind: Option<AssetKind>,
}
