use crate::entity::{BatchDraft, DraftId};
use crate::KernelError;

/// Short-lived storage for batches that are still collecting readings.
#[async_trait::async_trait]
pub trait BatchDraftStore: 'static + Sync + Send {
    async fn find(&self, id: &DraftId) -> error_stack::Result<Option<BatchDraft>, KernelError>;
    async fn save(&self, draft: &BatchDraft) -> error_stack::Result<(), KernelError>;
    async fn remove(&self, id: &DraftId) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnBatchDraftStore: 'static + Sync + Send {
    type BatchDraftStore: BatchDraftStore;
    fn batch_draft_store(&self) -> &Self::BatchDraftStore;
}
