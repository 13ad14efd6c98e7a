use error_stack::Report;
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use application::transfer::{BulkLoanDto, GetBoardDto, GetLoanDto, LoanCommandDto};
use kernel::interface::command::LoanCommand;
use kernel::prelude::entity::{
    Actor, AuditContext, LoanId, SelectLimit, SelectOffset, UserId, UserName,
};
use kernel::prelude::listing::{GroupBy, LoanFilter, LoanTab, SearchTerm};
use kernel::KernelError;

use crate::controller::{Intake, TryIntake};
use crate::request::date_range;

#[derive(Debug, Deserialize)]
pub struct GetBoardRequest {
    #[serde(default)]
    tab: LoanTab,
    #[serde(default)]
    search: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    from: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    to: Option<OffsetDateTime>,
    #[serde(default)]
    group_by: GroupBy,
    #[serde(default)]
    limit: SelectLimit,
    #[serde(default)]
    offset: SelectOffset,
}

#[derive(Debug)]
pub struct GetLoanRequest {
    id: Uuid,
}

impl GetLoanRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug, Deserialize)]
pub struct BulkLoanRequest {
    ids: Vec<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct RequestHandoverRequest {
    to_user_id: Uuid,
    to_name: String,
}

#[derive(Debug)]
pub struct HandoverAnswerRequest {
    id: Uuid,
    accept: bool,
}

impl HandoverAnswerRequest {
    pub fn accept(id: Uuid) -> Self {
        Self { id, accept: true }
    }

    pub fn decline(id: Uuid) -> Self {
        Self { id, accept: false }
    }
}

pub struct LoanTransformer;

impl TryIntake<(Actor, GetBoardRequest)> for LoanTransformer {
    type To = GetBoardDto;
    fn emit(
        &self,
        (actor, input): (Actor, GetBoardRequest),
    ) -> error_stack::Result<Self::To, KernelError> {
        if *input.limit.as_ref() <= 0 || *input.offset.as_ref() < 0 {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("limit must be positive and offset must not be negative"));
        }
        let range = date_range(input.from, input.to)?;
        Ok(GetBoardDto {
            actor,
            filter: LoanFilter::new(input.tab, SearchTerm::new(input.search), range),
            group_by: input.group_by,
            limit: input.limit,
            offset: input.offset,
        })
    }
}

impl Intake<(Actor, GetLoanRequest)> for LoanTransformer {
    type To = GetLoanDto;
    fn emit(&self, (actor, input): (Actor, GetLoanRequest)) -> Self::To {
        GetLoanDto {
            id: LoanId::new(input.id),
            actor,
        }
    }
}

impl Intake<(AuditContext, BulkLoanRequest)> for LoanTransformer {
    type To = BulkLoanDto;
    fn emit(&self, (context, input): (AuditContext, BulkLoanRequest)) -> Self::To {
        BulkLoanDto {
            ids: input.ids.into_iter().map(LoanId::new).collect(),
            context,
        }
    }
}

impl TryIntake<(AuditContext, Uuid, RequestHandoverRequest)> for LoanTransformer {
    type To = LoanCommandDto;
    fn emit(
        &self,
        (context, id, input): (AuditContext, Uuid, RequestHandoverRequest),
    ) -> error_stack::Result<Self::To, KernelError> {
        let to_name = input.to_name.trim();
        if to_name.is_empty() {
            return Err(Report::new(KernelError::Validation)
                .attach_printable("Handover target name must not be empty"));
        }
        Ok(LoanCommandDto {
            id: LoanId::new(id),
            command: LoanCommand::RequestHandover {
                to_user_id: UserId::new(input.to_user_id),
                to_name: UserName::new(to_name),
            },
            context,
        })
    }
}

impl Intake<(AuditContext, HandoverAnswerRequest)> for LoanTransformer {
    type To = LoanCommandDto;
    fn emit(&self, (context, input): (AuditContext, HandoverAnswerRequest)) -> Self::To {
        let command = if input.accept {
            LoanCommand::AcceptHandover
        } else {
            LoanCommand::DeclineHandover
        };
        LoanCommandDto {
            id: LoanId::new(input.id),
            command,
            context,
        }
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use kernel::interface::command::LoanCommand;
    use kernel::prelude::entity::{Actor, ActorRole, AuditContext, LoanId, UserId, UserName};
    use kernel::prelude::listing::{GroupBy, LoanTab};
    use kernel::KernelError;

    use super::{GetBoardRequest, HandoverAnswerRequest, LoanTransformer, RequestHandoverRequest};
    use crate::controller::{Intake, TryIntake};

    fn actor() -> Actor {
        Actor::new(
            UserId::new(Uuid::new_v4()),
            UserName::new("Operator"),
            ActorRole::Member,
        )
    }

    fn board(query: &str) -> GetBoardRequest {
        let uri: axum::http::Uri = format!("/loans?{query}").parse().unwrap();
        axum::extract::Query::<GetBoardRequest>::try_from_uri(&uri)
            .unwrap()
            .0
    }

    #[test]
    fn board_query_defaults() {
        let dto = TryIntake::emit(&LoanTransformer, (actor(), board(""))).unwrap();
        assert_eq!(dto.filter.tab(), LoanTab::Active);
        assert_eq!(dto.group_by, GroupBy::Receiver);
        assert_eq!(dto.filter.range().since(), None);
    }

    #[test]
    fn board_query_reads_range_and_grouping() {
        let request = board(
            "tab=history&group_by=batch&search=cerny&from=2026-05-01T00:00:00Z&to=2026-05-31T23:59:59Z",
        );
        let dto = TryIntake::emit(&LoanTransformer, (actor(), request)).unwrap();
        assert_eq!(dto.filter.tab(), LoanTab::History);
        assert_eq!(dto.group_by, GroupBy::Batch);
        assert_eq!(
            dto.filter.range().since(),
            Some(datetime!(2026-05-01 00:00 UTC))
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        let request = board("from=2026-05-31T00:00:00Z&to=2026-05-01T00:00:00Z");
        let error = TryIntake::emit(&LoanTransformer, (actor(), request)).unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);
    }

    #[test]
    fn handover_needs_a_name() {
        let context = AuditContext::new(actor(), None, OffsetDateTime::now_utc());
        let request = RequestHandoverRequest {
            to_user_id: Uuid::new_v4(),
            to_name: "  ".to_string(),
        };
        let error =
            TryIntake::emit(&LoanTransformer, (context, Uuid::new_v4(), request)).unwrap_err();
        assert_eq!(error.current_context(), &KernelError::Validation);
    }

    #[test]
    fn handover_answers_map_to_commands() {
        let context = AuditContext::new(actor(), None, OffsetDateTime::now_utc());
        let id = Uuid::new_v4();
        let accept = Intake::emit(
            &LoanTransformer,
            (context.clone(), HandoverAnswerRequest::accept(id)),
        );
        assert_eq!(accept.command, LoanCommand::AcceptHandover);
        assert_eq!(accept.id, LoanId::new(id));
        let decline = Intake::emit(&LoanTransformer, (context, HandoverAnswerRequest::decline(id)));
        assert_eq!(decline.command, LoanCommand::DeclineHandover);
    }
}
