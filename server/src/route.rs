mod asset;
mod batch;
mod loan;
mod report;

pub use self::{asset::*, batch::*, loan::*, report::*};
