use error_stack::ResultExt;
use serde::Deserialize;
use time::{OffsetDateTime, UtcOffset};

use application::transfer::GetHistoryReportDto;
use kernel::prelude::entity::Actor;
use kernel::KernelError;

use crate::controller::TryIntake;
use crate::request::date_range;

#[derive(Debug, Deserialize)]
pub struct GetHistoryReportRequest {
    #[serde(default, with = "time::serde::rfc3339::option")]
    from: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    to: Option<OffsetDateTime>,
    #[serde(default)]
    rows_per_page: Option<usize>,
    /// Offset of the reader's clock, used for the printed times.
    #[serde(default)]
    tz_offset_minutes: i32,
}

pub struct ReportTransformer;

impl TryIntake<(Actor, GetHistoryReportRequest)> for ReportTransformer {
    type To = GetHistoryReportDto;
    fn emit(
        &self,
        (actor, input): (Actor, GetHistoryReportRequest),
    ) -> error_stack::Result<Self::To, KernelError> {
        let offset = UtcOffset::from_whole_seconds(input.tz_offset_minutes.saturating_mul(60))
            .change_context(KernelError::Validation)
            .attach_printable_lazy(|| {
                format!("Invalid timezone offset: {} minutes", input.tz_offset_minutes)
            })?;
        Ok(GetHistoryReportDto {
            actor,
            range: date_range(input.from, input.to)?,
            rows_per_page: input.rows_per_page,
            offset,
        })
    }
}

#[cfg(test)]
mod test {
    use time::UtcOffset;
    use uuid::Uuid;

    use kernel::prelude::entity::{Actor, ActorRole, UserId, UserName};
    use kernel::KernelError;

    use super::{GetHistoryReportRequest, ReportTransformer};
    use crate::controller::TryIntake;

    fn request(query: &str) -> GetHistoryReportRequest {
        let uri: axum::http::Uri = format!("/reports/history?{query}").parse().unwrap();
        axum::extract::Query::<GetHistoryReportRequest>::try_from_uri(&uri)
            .unwrap()
            .0
    }

    fn manager() -> Actor {
        Actor::new(
            UserId::new(Uuid::new_v4()),
            UserName::new("Manager"),
            ActorRole::Manager,
        )
    }

    #[test]
    fn reads_page_size_and_offset() {
        let dto = ReportTransformer
            .emit((manager(), request("rows_per_page=10&tz_offset_minutes=120")))
            .unwrap();
        assert_eq!(dto.rows_per_page, Some(10));
        assert_eq!(dto.offset, UtcOffset::from_hms(2, 0, 0).unwrap());
    }

    #[test]
    fn defaults_to_utc() {
        let dto = ReportTransformer.emit((manager(), request(""))).unwrap();
        assert_eq!(dto.offset, UtcOffset::UTC);
        assert_eq!(dto.rows_per_page, None);
    }

    #[test]
    fn rejects_impossible_offset() {
        let error = ReportTransformer
            .emit((manager(), request("tz_offset_minutes=6000")))
            .unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);
    }
}
