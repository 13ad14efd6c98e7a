use crate::entity::{LoanRecord, LoanStatus};

/// Records split by where they show up on the board.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoanBoard {
    pub pending: Vec<LoanRecord>,
    pub active: Vec<LoanRecord>,
    pub history: Vec<LoanRecord>,
}

impl LoanBoard {
    pub fn classify(records: impl IntoIterator<Item = LoanRecord>) -> Self {
        records
            .into_iter()
            .fold(Self::default(), |mut board, record| {
                match record.status() {
                    LoanStatus::Pending => board.pending.push(record),
                    LoanStatus::Active => board.active.push(record),
                    LoanStatus::Completed | LoanStatus::Rejected => board.history.push(record),
                }
                board
            })
    }
}
