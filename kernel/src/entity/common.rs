mod event;
mod operation;
mod time;

pub use self::{event::*, operation::*, time::*};
