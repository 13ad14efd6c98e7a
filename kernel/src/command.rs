mod loan;

pub use self::loan::*;
