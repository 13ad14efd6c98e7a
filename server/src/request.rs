mod asset;
mod audit;
mod batch;
mod loan;
mod report;

pub use self::{asset::*, audit::*, batch::*, loan::*, report::*};

use error_stack::Report;
use kernel::prelude::entity::DateRange;
use kernel::KernelError;
use time::OffsetDateTime;

pub(crate) fn date_range(
    from: Option<OffsetDateTime>,
    to: Option<OffsetDateTime>,
) -> error_stack::Result<DateRange, KernelError> {
    match (from, to) {
        (Some(from), Some(to)) if to < from => Err(Report::new(KernelError::Validation)
            .attach_printable(format!("Range ends ({to}) before it starts ({from})"))),
        _ => Ok(DateRange::new(from, to)),
    }
}
