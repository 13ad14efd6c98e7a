use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Inclusive time window. Either end may be open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    #[serde(default, with = "time::serde::rfc3339::option")]
    from: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    to: Option<OffsetDateTime>,
}

impl DateRange {
    pub fn new(from: Option<OffsetDateTime>, to: Option<OffsetDateTime>) -> Self {
        Self { from, to }
    }

    pub fn since(&self) -> Option<OffsetDateTime> {
        self.from
    }

    pub fn until(&self) -> Option<OffsetDateTime> {
        self.to
    }

    pub fn contains(&self, time: OffsetDateTime) -> bool {
        self.from.map_or(true, |from| from <= time) && self.to.map_or(true, |to| time <= to)
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use super::DateRange;

    #[test]
    fn open_ends() {
        let time = datetime!(2026-03-01 12:00 UTC);
        assert!(DateRange::default().contains(time));
        assert!(DateRange::new(Some(time), None).contains(time));
        assert!(!DateRange::new(None, Some(datetime!(2026-02-28 23:59 UTC))).contains(time));
    }
}
