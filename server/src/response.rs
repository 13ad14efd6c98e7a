mod asset;
mod audit;
mod batch;
mod loan;
mod report;

pub use self::{asset::*, audit::*, batch::*, loan::*, report::*};
