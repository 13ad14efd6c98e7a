use application::service::BatchDraftService;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use uuid::Uuid;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::{audit_context, CurrentActor, RequestOrigin};
use crate::handler::AppModule;
use crate::request::{
    BatchTransformer, DraftRequest, StartCheckoutRequest, StartReturnRequest, SubmitReadingRequest,
};
use crate::response::BatchPresenter;

pub trait BatchRouter {
    fn route_batch(self) -> Self;
}

impl BatchRouter for Router<AppModule> {
    fn route_batch(self) -> Self {
        self.route(
            "/batches/checkout",
            post(
                |State(module): State<AppModule>,
                 actor: CurrentActor,
                 origin: RequestOrigin,
                 Json(req): Json<StartCheckoutRequest>| async move {
                    Controller::new(BatchTransformer, BatchPresenter)
                        .intake((audit_context(actor, origin), req))
                        .handle(|dto| async move { module.start_checkout(dto).await })
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/batches/return",
            post(
                |State(module): State<AppModule>,
                 actor: CurrentActor,
                 origin: RequestOrigin,
                 Json(req): Json<StartReturnRequest>| async move {
                    Controller::new(BatchTransformer, BatchPresenter)
                        .intake((audit_context(actor, origin), req))
                        .handle(|dto| async move { module.start_return(dto).await })
                        .await
                        .map(|res| (StatusCode::CREATED, res))
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/batches/:id",
            get(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(BatchTransformer, BatchPresenter)
                        .intake((actor, DraftRequest::new(id)))
                        .handle(|dto| async move { module.get_draft(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            )
            .delete(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(BatchTransformer, BatchPresenter)
                        .intake((actor, DraftRequest::new(id)))
                        .handle(|dto| async move { module.discard_draft(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/batches/:id/readings",
            post(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 Path(id): Path<Uuid>,
                 Json(req): Json<SubmitReadingRequest>| async move {
                    Controller::new(BatchTransformer, BatchPresenter)
                        .intake((actor, id, req))
                        .handle(|dto| async move { module.submit_reading(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/batches/:id/commit",
            post(
                |State(module): State<AppModule>,
                 actor: CurrentActor,
                 origin: RequestOrigin,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(BatchTransformer, BatchPresenter)
                        .intake((audit_context(actor, origin), DraftRequest::new(id)))
                        .handle(|dto| async move { module.commit_draft(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
