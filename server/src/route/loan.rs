use application::service::{AuditTrailService, GetLoanService, LoanTransitionService};
use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use error_stack::Report;
use kernel::KernelError;
use uuid::Uuid;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::{audit_context, CurrentActor, RequestOrigin};
use crate::handler::AppModule;
use crate::request::{
    AuditTransformer, BulkLoanRequest, GetAuditTrailRequest, GetBoardRequest, GetLoanRequest,
    HandoverAnswerRequest, LoanTransformer, RequestHandoverRequest,
};
use crate::response::{AuditPresenter, LoanPresenter};

pub trait LoanRouter {
    fn route_loan(self) -> Self;
}

impl LoanRouter for Router<AppModule> {
    fn route_loan(self) -> Self {
        self.route(
            "/loans",
            get(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 Query(req): Query<GetBoardRequest>| async move {
                    Controller::new(LoanTransformer, LoanPresenter)
                        .try_intake((actor, req))
                        .handle(|dto| async move { module.get_board(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/loans/confirm",
            post(
                |State(module): State<AppModule>,
                 actor: CurrentActor,
                 origin: RequestOrigin,
                 Json(req): Json<BulkLoanRequest>| async move {
                    Controller::new(LoanTransformer, LoanPresenter)
                        .intake((audit_context(actor, origin), req))
                        .handle(|dto| async move { module.confirm_loans(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/loans/reject",
            post(
                |State(module): State<AppModule>,
                 actor: CurrentActor,
                 origin: RequestOrigin,
                 Json(req): Json<BulkLoanRequest>| async move {
                    Controller::new(LoanTransformer, LoanPresenter)
                        .intake((audit_context(actor, origin), req))
                        .handle(|dto| async move { module.reject_loans(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/loans/cancel",
            post(
                |State(module): State<AppModule>,
                 actor: CurrentActor,
                 origin: RequestOrigin,
                 Json(req): Json<BulkLoanRequest>| async move {
                    Controller::new(LoanTransformer, LoanPresenter)
                        .intake((audit_context(actor, origin), req))
                        .handle(|dto| async move { module.cancel_loans(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/loans/:id",
            get(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(LoanTransformer, LoanPresenter)
                        .intake((actor, GetLoanRequest::new(id)))
                        .handle(|dto| async move { module.get_loan(dto).await })
                        .await
                        .and_then(|res| {
                            res.ok_or_else(|| {
                                Report::new(KernelError::NotFound)
                                    .attach_printable(format!("Loan {id} does not exist"))
                            })
                        })
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/loans/:id/audit",
            get(
                |State(module): State<AppModule>,
                 CurrentActor(actor): CurrentActor,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(AuditTransformer, AuditPresenter)
                        .intake((actor, GetAuditTrailRequest::new(id)))
                        .handle(|dto| async move { module.audit_trail(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/loans/:id/handover",
            post(
                |State(module): State<AppModule>,
                 actor: CurrentActor,
                 origin: RequestOrigin,
                 Path(id): Path<Uuid>,
                 Json(req): Json<RequestHandoverRequest>| async move {
                    Controller::new(LoanTransformer, LoanPresenter)
                        .try_intake((audit_context(actor, origin), id, req))
                        .handle(|dto| async move { module.apply_command(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/loans/:id/handover/accept",
            post(
                |State(module): State<AppModule>,
                 actor: CurrentActor,
                 origin: RequestOrigin,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(LoanTransformer, LoanPresenter)
                        .intake((audit_context(actor, origin), HandoverAnswerRequest::accept(id)))
                        .handle(|dto| async move { module.apply_command(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
        .route(
            "/loans/:id/handover/decline",
            post(
                |State(module): State<AppModule>,
                 actor: CurrentActor,
                 origin: RequestOrigin,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(LoanTransformer, LoanPresenter)
                        .intake((audit_context(actor, origin), HandoverAnswerRequest::decline(id)))
                        .handle(|dto| async move { module.apply_command(dto).await })
                        .await
                        .map_err(ErrorStatus::from)
                },
            ),
        )
    }
}
