mod loan;
mod vehicle;

pub use self::{loan::*, vehicle::*};
