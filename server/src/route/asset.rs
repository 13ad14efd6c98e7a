use application::service::AvailableAssetService;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::CurrentActor;
use crate::handler::AppModule;
use crate::request::{AssetTransformer, GetAvailableAssetRequest};
use crate::response::AssetPresenter;

pub trait AssetRouter {
    fn route_asset(self) -> Self;
}

impl AssetRouter for Router<AppModule> {
    fn route_asset(self) -> Self {
        self.route(
            "/assets/available",
            get(
                |State(module): State<AppModule>,
                 _: CurrentActor,
                 Query(req): Query<GetAvailableAssetRequest>| async move {
                    Controller::new(AssetTransformer, AssetPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.available_assets(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
