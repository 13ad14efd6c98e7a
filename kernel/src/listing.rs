mod availability;
mod board;
mod filter;
mod group;
mod search;

pub use self::{availability::*, board::*, filter::*, group::*, search::*};

#[cfg(test)]
mod test {
    use time::macros::datetime;
    use time::OffsetDateTime;
    use uuid::Uuid;

    use super::{available_assets, group, GroupBy, LoanBoard, LoanFilter, LoanTab, Registrations, SearchTerm};
    use crate::entity::{
        Actor, ActorRole, Asset, AssetId, AssetKind, AssetLabel, BatchId, CheckoutTime, DateRange,
        EventVersion, LoanDescription, LoanId, LoanMeta, LoanRecord, LoanStatus,
        RegistrationNumber, ReturnedAt, SignatureHash, UserId, UserName,
    };

    struct Fixture {
        operator: UserId,
        batch: BatchId,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                operator: UserId::new(Uuid::new_v4()),
                batch: BatchId::new(Uuid::new_v4()),
            }
        }

        fn record(
            &self,
            receiver: (&UserId, &str),
            description: &str,
            status: LoanStatus,
            checkout: OffsetDateTime,
            returned: Option<OffsetDateTime>,
        ) -> LoanRecord {
            LoanRecord::new(
                LoanId::new(Uuid::new_v4()),
                self.batch,
                self.operator,
                *receiver.0,
                UserName::new(receiver.1),
                AssetKind::Radio,
                AssetId::new(Uuid::new_v4()),
                LoanDescription::new(description),
                CheckoutTime::new(checkout),
                returned.map(ReturnedAt::new),
                status,
                LoanMeta::default(),
                None,
                None,
                SignatureHash::default(),
                EventVersion::new(0),
            )
        }
    }

    fn member(id: &UserId) -> Actor {
        Actor::new(*id, UserName::new("member"), ActorRole::Member)
    }

    #[test]
    fn classify_splits_by_status() {
        let fixture = Fixture::new();
        let jane = UserId::new(Uuid::new_v4());
        let at = datetime!(2026-04-01 10:00 UTC);
        let board = LoanBoard::classify(vec![
            fixture.record((&jane, "Jane"), "radio", LoanStatus::Pending, at, None),
            fixture.record((&jane, "Jane"), "vest", LoanStatus::Active, at, None),
            fixture.record((&jane, "Jane"), "radio 2", LoanStatus::Completed, at, Some(at)),
            fixture.record((&jane, "Jane"), "vest 2", LoanStatus::Rejected, at, Some(at)),
        ]);
        assert_eq!(board.pending.len(), 1);
        assert_eq!(board.active.len(), 1);
        assert_eq!(board.history.len(), 2);
    }

    #[test]
    fn members_only_see_their_loans() {
        let fixture = Fixture::new();
        let jane = UserId::new(Uuid::new_v4());
        let bob = UserId::new(Uuid::new_v4());
        let at = datetime!(2026-04-01 10:00 UTC);
        let records = vec![
            fixture.record((&jane, "Jane"), "radio", LoanStatus::Active, at, None),
            fixture.record((&bob, "Bob"), "vest", LoanStatus::Active, at, None),
        ];
        let filter = LoanFilter::default();
        let registrations = Registrations::new();

        let seen = filter.apply(&member(&jane), records.clone(), &registrations);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].receiver_id(), &jane);

        let operator = member(&fixture.operator);
        assert_eq!(filter.apply(&operator, records.clone(), &registrations).len(), 2);

        let manager = Actor::new(
            UserId::new(Uuid::new_v4()),
            UserName::new("boss"),
            ActorRole::Manager,
        );
        assert_eq!(filter.apply(&manager, records, &registrations).len(), 2);
    }

    #[test]
    fn search_covers_registration_and_accents() {
        let fixture = Fixture::new();
        let jan = UserId::new(Uuid::new_v4());
        let at = datetime!(2026-04-01 10:00 UTC);
        let record = fixture.record((&jan, "Jan Černý"), "Octavia", LoanStatus::Active, at, None);
        let mut registrations = Registrations::new();
        registrations.insert(*record.asset_id(), RegistrationNumber::new("1AB 2345"));
        let manager = Actor::new(jan, UserName::new("Jan"), ActorRole::Manager);

        for term in ["cerny", "OCTÁVIA", "1ab"] {
            let filter = LoanFilter::new(LoanTab::Active, SearchTerm::new(term), DateRange::default());
            assert_eq!(
                filter.apply(&manager, vec![record.clone()], &registrations).len(),
                1,
                "{term}"
            );
        }
        let filter = LoanFilter::new(LoanTab::Active, SearchTerm::new("fabia"), DateRange::default());
        assert!(filter.apply(&manager, vec![record], &registrations).is_empty());
    }

    #[test]
    fn history_ranges_on_return_time() {
        let fixture = Fixture::new();
        let jane = UserId::new(Uuid::new_v4());
        let record = fixture.record(
            (&jane, "Jane"),
            "radio",
            LoanStatus::Completed,
            datetime!(2026-03-30 08:00 UTC),
            Some(datetime!(2026-04-02 16:00 UTC)),
        );
        let april = DateRange::new(
            Some(datetime!(2026-04-01 00:00 UTC)),
            Some(datetime!(2026-04-30 23:59 UTC)),
        );
        let history = LoanFilter::new(LoanTab::History, SearchTerm::default(), april.clone());
        assert!(history.matches(&record, &Registrations::new()));

        let active = LoanFilter::new(LoanTab::Active, SearchTerm::default(), april);
        assert!(!active.matches(&record, &Registrations::new()));
    }

    #[test]
    fn groups_are_most_recent_first() {
        let fixture = Fixture::new();
        let jane = UserId::new(Uuid::new_v4());
        let bob = UserId::new(Uuid::new_v4());
        let records = vec![
            fixture.record((&jane, "Jane"), "old", LoanStatus::Active, datetime!(2026-04-01 08:00 UTC), None),
            fixture.record((&bob, "Bob"), "mid", LoanStatus::Active, datetime!(2026-04-02 08:00 UTC), None),
            fixture.record((&jane, "Jane"), "new", LoanStatus::Active, datetime!(2026-04-03 08:00 UTC), None),
        ];
        let groups = group(records.clone(), GroupBy::Receiver, LoanTab::Active);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].title, "Jane");
        assert_eq!(groups[0].records[0].description().as_ref(), "new");
        assert_eq!(groups[0].records[1].description().as_ref(), "old");
        assert_eq!(groups[1].title, "Bob");

        let batches = group(records, GroupBy::Batch, LoanTab::Active);
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].records.len(), 3);
    }

    #[test]
    fn open_loans_make_assets_unavailable() {
        let fixture = Fixture::new();
        let jane = UserId::new(Uuid::new_v4());
        let at = datetime!(2026-04-01 10:00 UTC);
        let open = fixture.record((&jane, "Jane"), "radio", LoanStatus::Pending, at, None);
        let closed = fixture.record((&jane, "Jane"), "vest", LoanStatus::Completed, at, Some(at));
        let free = AssetId::new(Uuid::new_v4());
        let assets = vec![
            Asset::new(*open.asset_id(), AssetKind::Radio, AssetLabel::new("Radio 1")),
            Asset::new(*closed.asset_id(), AssetKind::Vest, AssetLabel::new("Vest 1")),
            Asset::new(free, AssetKind::Radio, AssetLabel::new("Radio 2")),
        ];
        let loans = [open, closed];

        let available = available_assets(assets.clone(), loans.iter(), None);
        assert_eq!(available.len(), 2);
        assert!(available.iter().all(|asset| asset.id() != loans[0].asset_id()));

        let radios = available_assets(assets, loans.iter(), Some(AssetKind::Radio));
        assert_eq!(radios.len(), 1);
        assert_eq!(radios[0].id(), &free);
    }
}
