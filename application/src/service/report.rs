use error_stack::{Report, ResultExt};
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use kernel::interface::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use kernel::interface::query::DependOnLoanQuery;
use kernel::prelude::entity::LoanRecord;
use kernel::prelude::listing::{LoanFilter, LoanTab};
use kernel::KernelError;

use crate::service::collect_closed;
use crate::transfer::{
    GetHistoryReportDto, HistoryReportDto, PrintLayoutDto, ReportPageDto, ReportRowDto,
    DEFAULT_ROWS_PER_PAGE,
};

const REPORT_TIME: &[FormatItem<'static>] =
    format_description!("[day].[month].[year] [hour]:[minute]");

#[async_trait::async_trait]
pub trait HistoryReportService:
    'static + Sync + Send + DependOnDatabaseConnection + DependOnLoanQuery
{
    async fn history_report(
        &self,
        dto: GetHistoryReportDto,
    ) -> error_stack::Result<HistoryReportDto, KernelError> {
        let rows_per_page = dto.rows_per_page.unwrap_or(DEFAULT_ROWS_PER_PAGE);
        if rows_per_page == 0 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("Rows per page must be positive"));
        }
        let mut con = self.database_connection().transact().await?;
        let participant = (!dto.actor.is_manager()).then(|| dto.actor.id());
        let mut records =
            collect_closed(self.loan_query(), &mut con, &dto.range, participant).await?;
        con.commit().await?;

        records.retain(|record| LoanFilter::visible_to(&dto.actor, record));
        records.sort_by_key(|record| std::cmp::Reverse(LoanTab::History.time_of(record)));
        build_report(&records, rows_per_page, dto.offset)
    }
}

impl<T> HistoryReportService for T where T: DependOnDatabaseConnection + DependOnLoanQuery {}

fn format_time(time: OffsetDateTime, offset: UtcOffset) -> error_stack::Result<String, KernelError> {
    time.to_offset(offset)
        .format(REPORT_TIME)
        .change_context_lazy(|| KernelError::Internal)
}

fn report_row(record: &LoanRecord, offset: UtcOffset) -> error_stack::Result<ReportRowDto, KernelError> {
    let returned = match record.return_time() {
        Some(time) => format_time(*time.as_ref(), offset)?,
        None => String::new(),
    };
    Ok(ReportRowDto {
        checkout: format_time(*record.checkout_time().as_ref(), offset)?,
        returned,
        receiver: record.receiver_name().to_string(),
        asset_kind: *record.asset_kind(),
        description: record.description().to_string(),
        km_start: record.meta().km_start.map(|km| *km.as_ref()),
        km_end: record.meta().km_end.map(|km| *km.as_ref()),
        status: *record.status(),
    })
}

/// Splits records into printable pages. An empty report still has one page.
pub fn build_report(
    records: &[LoanRecord],
    rows_per_page: usize,
    offset: UtcOffset,
) -> error_stack::Result<HistoryReportDto, KernelError> {
    let rows = records
        .iter()
        .map(|record| report_row(record, offset))
        .collect::<error_stack::Result<Vec<_>, KernelError>>()?;
    let total_rows = rows.len();
    let mut pages = rows
        .chunks(rows_per_page.max(1))
        .enumerate()
        .map(|(index, rows)| ReportPageDto {
            number: index + 1,
            rows: rows.to_vec(),
        })
        .collect::<Vec<_>>();
    if pages.is_empty() {
        pages.push(ReportPageDto {
            number: 1,
            rows: Vec::new(),
        });
    }
    Ok(HistoryReportDto {
        layout: PrintLayoutDto::default(),
        rows_per_page,
        total_rows,
        pages,
    })
}

#[cfg(test)]
mod test {
    use time::macros::{datetime, offset};
    use uuid::Uuid;

    use kernel::prelude::entity::{
        AssetId, AssetKind, BatchId, CheckoutTime, EventVersion, Kilometers, LoanDescription,
        LoanId, LoanMeta, LoanRecord, LoanStatus, ReturnedAt, SignatureHash, UserId, UserName,
    };

    use super::build_report;
    use crate::transfer::{Orientation, PageSize};

    fn completed(km_start: i64, km_end: i64) -> LoanRecord {
        let meta = LoanMeta {
            km_start: Some(Kilometers::new(km_start)),
            km_end: Some(Kilometers::new(km_end)),
            ..LoanMeta::default()
        };
        LoanRecord::new(
            LoanId::new(Uuid::new_v4()),
            BatchId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            UserName::new("Jane"),
            AssetKind::Vehicle,
            AssetId::new(Uuid::new_v4()),
            LoanDescription::new("Octavia"),
            CheckoutTime::new(datetime!(2026-05-01 06:05 UTC)),
            Some(ReturnedAt::new(datetime!(2026-05-01 15:30 UTC))),
            LoanStatus::Completed,
            meta,
            None,
            None,
            SignatureHash::default(),
            EventVersion::new(2),
        )
    }

    #[test]
    fn rows_are_formatted_and_paged() {
        let records = (0..7).map(|i| completed(1000, 1000 + i)).collect::<Vec<_>>();
        let report = build_report(&records, 3, offset!(+2)).unwrap();

        assert_eq!(report.total_rows, 7);
        assert_eq!(report.pages.len(), 3);
        assert_eq!(report.pages[2].number, 3);
        assert_eq!(report.pages[2].rows.len(), 1);

        let row = &report.pages[0].rows[0];
        assert_eq!(row.checkout, "01.05.2026 08:05");
        assert_eq!(row.returned, "01.05.2026 17:30");
        assert_eq!(row.km_start, Some(1000));
        assert_eq!(row.km_end, Some(1000));
        assert_eq!(row.receiver, "Jane");

        assert_eq!(report.layout.page_size, PageSize::A4);
        assert_eq!(report.layout.orientation, Orientation::Landscape);
        assert_eq!(report.layout.margin_mm, 10);
    }

    #[test]
    fn empty_report_has_one_page() {
        let report = build_report(&[], 25, offset!(UTC)).unwrap();
        assert_eq!(report.total_rows, 0);
        assert_eq!(report.pages.len(), 1);
        assert!(report.pages[0].rows.is_empty());
    }
}
