mod asset;
mod loan;
mod vehicle;

pub use self::{asset::*, loan::*, vehicle::*};
