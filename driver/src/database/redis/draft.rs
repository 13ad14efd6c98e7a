use error_stack::{Report, ResultExt};
use redis::AsyncCommands;

use kernel::interface::draft::BatchDraftStore;
use kernel::prelude::entity::{BatchDraft, DraftId};
use kernel::KernelError;

use crate::database::redis::RedisDatabase;
use crate::env;
use crate::error::ConvertError;

const DRAFT_TTL_SECS: &str = "DRAFT_TTL_SECS";
const DEFAULT_TTL_SECS: u64 = 1800;

fn key(id: &DraftId) -> String {
    format!("batch-draft:{id}")
}

/// Drafts stored as JSON under `batch-draft:{id}`. Every save refreshes the
/// expiry, so abandoned drafts disappear on their own.
pub struct RedisDraftRepository {
    db: RedisDatabase,
    ttl_secs: u64,
}

impl RedisDraftRepository {
    pub fn new(db: RedisDatabase, ttl_secs: u64) -> Self {
        Self { db, ttl_secs }
    }

    pub fn from_env(db: RedisDatabase) -> error_stack::Result<Self, KernelError> {
        let ttl_secs = match env(DRAFT_TTL_SECS) {
            Ok(value) => value
                .parse::<u64>()
                .change_context_lazy(|| KernelError::Internal)
                .attach_printable_lazy(|| format!("{DRAFT_TTL_SECS} is not a number: {value}"))?,
            Err(_) => DEFAULT_TTL_SECS,
        };
        Ok(Self::new(db, ttl_secs))
    }
}

#[async_trait::async_trait]
impl BatchDraftStore for RedisDraftRepository {
    async fn find(&self, id: &DraftId) -> error_stack::Result<Option<BatchDraft>, KernelError> {
        let mut con = self.db.connection().await?;
        let raw: Option<String> = con.get(key(id)).await.convert_error()?;
        raw.map(|raw| {
            serde_json::from_str(&raw)
                .change_context_lazy(|| KernelError::Internal)
                .attach_printable_lazy(|| format!("Draft {id} is corrupted"))
        })
        .transpose()
    }

    async fn save(&self, draft: &BatchDraft) -> error_stack::Result<(), KernelError> {
        let json = serde_json::to_string(draft).change_context_lazy(|| KernelError::Internal)?;
        let mut con = self.db.connection().await?;
        redis::cmd("SET")
            .arg(key(draft.id()))
            .arg(json)
            .arg("EX")
            .arg(self.ttl_secs)
            .query_async::<_, ()>(&mut con)
            .await
            .convert_error()?;
        tracing::debug!("saved draft {} ({} reading(s) outstanding)", draft.id(), draft.queue().len());
        Ok(())
    }

    async fn remove(&self, id: &DraftId) -> error_stack::Result<(), KernelError> {
        let mut con = self.db.connection().await?;
        let removed: i64 = con.del(key(id)).await.convert_error()?;
        if removed == 0 {
            return Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("Draft {id} does not exist or expired")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use time::OffsetDateTime;
    use uuid::Uuid;

    use kernel::interface::draft::BatchDraftStore;
    use kernel::prelude::entity::{
        AssetId, AssetKind, BatchDraft, DraftId, DraftItem, Kilometers, LoanDescription,
        MileageReading, UserId, UserName,
    };
    use kernel::KernelError;

    use crate::database::redis::{RedisDatabase, RedisDraftRepository};

    #[test_with::env(REDIS_TEST)]
    #[tokio::test]
    async fn test() -> error_stack::Result<(), KernelError> {
        let store = RedisDraftRepository::new(RedisDatabase::new()?, 60);
        let vehicle = AssetId::new(Uuid::new_v4());
        let mut draft = BatchDraft::checkout(
            DraftId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            UserId::new(Uuid::new_v4()),
            UserName::new("Jane"),
            vec![DraftItem::checkout(
                vehicle,
                AssetKind::Vehicle,
                LoanDescription::new("Octavia"),
                Some(Kilometers::new(1000)),
            )],
            OffsetDateTime::now_utc(),
        )?;
        store.save(&draft).await?;
        assert_eq!(store.find(draft.id()).await?, Some(draft.clone()));

        draft.submit(MileageReading::new(vehicle, Kilometers::new(1000), None, None))?;
        store.save(&draft).await?;
        let found = store.find(draft.id()).await?;
        assert!(found.is_some_and(|found| found.is_ready()));

        store.remove(draft.id()).await?;
        assert!(store.find(draft.id()).await?.is_none());
        let again = store.remove(draft.id()).await.unwrap_err();
        assert_eq!(again.current_context(), &KernelError::NotFound);
        Ok(())
    }
}
