use time::UtcOffset;

use kernel::prelude::entity::{Actor, AssetKind, DateRange, LoanStatus};

pub const DEFAULT_ROWS_PER_PAGE: usize = 25;

#[derive(Debug)]
pub struct GetHistoryReportDto {
    pub actor: Actor,
    pub range: DateRange,
    pub rows_per_page: Option<usize>,
    pub offset: UtcOffset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageSize {
    A4,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// How a client should print the report pages.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrintLayoutDto {
    pub page_size: PageSize,
    pub orientation: Orientation,
    pub margin_mm: u32,
    pub scale: f32,
}

impl Default for PrintLayoutDto {
    fn default() -> Self {
        Self {
            page_size: PageSize::A4,
            orientation: Orientation::Landscape,
            margin_mm: 10,
            scale: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportRowDto {
    pub checkout: String,
    pub returned: String,
    pub receiver: String,
    pub asset_kind: AssetKind,
    pub description: String,
    pub km_start: Option<i64>,
    pub km_end: Option<i64>,
    pub status: LoanStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportPageDto {
    pub number: usize,
    pub rows: Vec<ReportRowDto>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoryReportDto {
    pub layout: PrintLayoutDto,
    pub rows_per_page: usize,
    pub total_rows: usize,
    pub pages: Vec<ReportPageDto>,
}
