use std::marker::PhantomData;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventVersion<T> {
    /*
     * Nothing means that no event has been recorded for the entity yet
     */
    Nothing,
    /*
     * Exact is the version of the last event applied to the entity
     */
    Exact(i64, PhantomData<T>),
}

impl<T> EventVersion<T> {
    pub fn new(version: i64) -> Self {
        if version < 0 {
            Self::Nothing
        } else {
            Self::Exact(version, PhantomData)
        }
    }

    pub fn next(&self) -> Self {
        Self::new(self.as_ref() + 1)
    }
}

impl<T> From<i64> for EventVersion<T> {
    fn from(version: i64) -> Self {
        Self::new(version)
    }
}

impl<T> AsRef<i64> for EventVersion<T> {
    fn as_ref(&self) -> &i64 {
        match self {
            Self::Nothing => &-1,
            Self::Exact(version, _) => version,
        }
    }
}

#[cfg(test)]
mod test {
    use super::EventVersion;

    #[test]
    fn next_starts_from_zero() {
        let nothing: EventVersion<()> = EventVersion::Nothing;
        assert_eq!(nothing.next(), EventVersion::new(0));
        assert_eq!(*EventVersion::<()>::new(4).next().as_ref(), 5);
    }

    #[test]
    fn negative_is_nothing() {
        assert_eq!(EventVersion::<()>::new(-3), EventVersion::Nothing);
    }
}
