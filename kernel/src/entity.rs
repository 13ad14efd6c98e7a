mod asset;
mod audit;
mod common;
mod draft;
mod loan;
mod user;
mod vehicle;

pub use self::{asset::*, audit::*, common::*, draft::*, loan::*, user::*, vehicle::*};
