mod command;
mod database;
mod draft;
mod entity;
mod error;
mod event;
mod lifecycle;
mod listing;
mod modify;
mod query;
mod signature;

pub use self::error::*;

#[cfg(feature = "prelude")]
pub mod prelude {
    pub mod entity {
        pub use crate::entity::*;
    }
    pub mod listing {
        pub use crate::listing::*;
    }
}

#[cfg(feature = "interface")]
pub mod interface {
    pub mod database {
        pub use crate::database::*;
    }
    pub mod command {
        pub use crate::command::*;
    }
    pub mod event {
        pub use crate::event::*;
    }
    pub mod lifecycle {
        pub use crate::lifecycle::*;
    }
    pub mod query {
        pub use crate::query::*;
    }
    pub mod update {
        pub use crate::modify::*;
    }
    pub mod draft {
        pub use crate::draft::*;
    }
    pub mod signature {
        pub use crate::signature::*;
    }
}
