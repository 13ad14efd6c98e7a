use application::service::HistoryReportService;
use axum::extract::{Query, State};
use axum::routing::get;
use axum::Router;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::CurrentActor;
use crate::handler::AppModule;
use crate::request::{GetHistoryReportRequest, ReportTransformer};
use crate::response::ReportPresenter;

pub trait ReportRouter {
    fn route_report(self) -> Self;
}

impl ReportRouter for Router<AppModule> {
    fn route_report(self) -> Self {
        self.route(
            "/reports/history",
            get(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 Query(req): Query<GetHistoryReportRequest>| async move {
                    Controller::new(ReportTransformer, ReportPresenter)
                        .try_intake((actor, req))
                        .handle(|dto| async move { module.history_report(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
