use time::OffsetDateTime;
use vodca::References;

/// Half-open rental interval `[start, end)`.
#[derive(Debug, Clone, Hash, Eq, PartialEq, References)]
pub struct BookingPeriod {
    start: OffsetDateTime,
    end: OffsetDateTime,
}

impl BookingPeriod {
    pub fn new(start: impl Into<OffsetDateTime>, end: impl Into<OffsetDateTime>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// `end > start`, strictly. Checked once at creation time.
    pub fn is_positive(&self) -> bool {
        self.end > self.start
    }

    pub fn contains(&self, instant: OffsetDateTime) -> bool {
        self.start < instant && self.end > instant
    }

    pub fn starts_after(&self, instant: OffsetDateTime) -> bool {
        self.start > instant
    }

    pub fn ends_before(&self, instant: OffsetDateTime) -> bool {
        self.end < instant
    }
}

#[cfg(test)]
mod test {
    use time::macros::datetime;

    use super::BookingPeriod;

    #[test]
    fn zero_length_period_is_not_positive() {
        let at = datetime!(2024-03-01 12:00 UTC);
        assert!(!BookingPeriod::new(at, at).is_positive());
    }

    #[test]
    fn inverted_period_is_not_positive() {
        let period = BookingPeriod::new(
            datetime!(2024-03-02 12:00 UTC),
            datetime!(2024-03-01 12:00 UTC),
        );
        assert!(!period.is_positive());
    }

    #[test]
    fn contains_excludes_both_endpoints() {
        let period = BookingPeriod::new(
            datetime!(2024-03-01 12:00 UTC),
            datetime!(2024-03-03 12:00 UTC),
        );
        assert!(period.contains(datetime!(2024-03-02 12:00 UTC)));
        assert!(!period.contains(datetime!(2024-03-01 12:00 UTC)));
        assert!(!period.contains(datetime!(2024-03-03 12:00 UTC)));
    }
}
