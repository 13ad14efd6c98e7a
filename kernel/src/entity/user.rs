mod actor;
mod id;
mod name;

pub use self::{actor::*, id::*, name::*};
