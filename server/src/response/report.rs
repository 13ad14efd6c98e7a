use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use application::transfer::{
    HistoryReportDto, Orientation, PageSize, PrintLayoutDto, ReportPageDto, ReportRowDto,
};
use kernel::prelude::entity::{AssetKind, LoanStatus};

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct PrintLayoutResponse {
    page_size: &'static str,
    orientation: &'static str,
    margin_mm: u32,
    scale: f32,
}

impl From<PrintLayoutDto> for PrintLayoutResponse {
    fn from(layout: PrintLayoutDto) -> Self {
        Self {
            page_size: match layout.page_size {
                PageSize::A4 => "A4",
            },
            orientation: match layout.orientation {
                Orientation::Portrait => "portrait",
                Orientation::Landscape => "landscape",
            },
            margin_mm: layout.margin_mm,
            scale: layout.scale,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportRowResponse {
    checkout: String,
    #[serde(rename = "return")]
    returned: String,
    receiver: String,
    asset_kind: AssetKind,
    description: String,
    km_start: Option<i64>,
    km_end: Option<i64>,
    status: LoanStatus,
}

impl From<ReportRowDto> for ReportRowResponse {
    fn from(row: ReportRowDto) -> Self {
        Self {
            checkout: row.checkout,
            returned: row.returned,
            receiver: row.receiver,
            asset_kind: row.asset_kind,
            description: row.description,
            km_start: row.km_start,
            km_end: row.km_end,
            status: row.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReportPageResponse {
    number: usize,
    rows: Vec<ReportRowResponse>,
}

impl From<ReportPageDto> for ReportPageResponse {
    fn from(page: ReportPageDto) -> Self {
        Self {
            number: page.number,
            rows: page.rows.into_iter().map(ReportRowResponse::from).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HistoryReportResponse {
    layout: PrintLayoutResponse,
    rows_per_page: usize,
    total_rows: usize,
    pages: Vec<ReportPageResponse>,
}

impl IntoResponse for HistoryReportResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

pub struct ReportPresenter;

impl Exhaust<HistoryReportDto> for ReportPresenter {
    type To = HistoryReportResponse;
    fn emit(&self, input: HistoryReportDto) -> Self::To {
        HistoryReportResponse {
            layout: input.layout.into(),
            rows_per_page: input.rows_per_page,
            total_rows: input.total_rows,
            pages: input.pages.into_iter().map(ReportPageResponse::from).collect(),
        }
    }
}
