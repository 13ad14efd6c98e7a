mod asset;
mod audit;
mod batch;
mod loan;
#[cfg(test)]
mod memory;
mod report;

pub use self::{asset::*, audit::*, batch::*, loan::*, report::*};
