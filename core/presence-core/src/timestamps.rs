//! Opened/accessed timestamp pair with the `opened_at <= accessed_at` invariant.
//!
//! Writers fire events in whatever order the host delivers them, so neither
//! setter rejects input. Each one corrects the pair instead:
//!
//! - Opening later than the last access pulls the access forward.
//! - An access earlier than the open is clamped up to the open.

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Timestamps {
    opened_at: DateTime<Utc>,
    accessed_at: DateTime<Utc>,
}

impl Timestamps {
    /// A pair that was opened and last accessed at the same instant.
    pub fn new(opened_at: DateTime<Utc>) -> Self {
        Self {
            opened_at,
            accessed_at: opened_at,
        }
    }

    /// Builds a pair from arbitrary values, clamping `accessed_at` up to `opened_at`.
    pub fn from_pair(opened_at: DateTime<Utc>, accessed_at: DateTime<Utc>) -> Self {
        let mut pair = Self::new(opened_at);
        pair.set_accessed_at(accessed_at);
        pair
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn accessed_at(&self) -> DateTime<Utc> {
        self.accessed_at
    }

    pub fn set_opened_at(&mut self, value: DateTime<Utc>) {
        self.opened_at = value;
        if self.accessed_at < value {
            self.accessed_at = value;
        }
    }

    pub fn set_accessed_at(&mut self, value: DateTime<Utc>) {
        self.accessed_at = value.max(self.opened_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000, 0).unwrap() + Duration::seconds(secs)
    }

    #[test]
    fn new_pair_is_opened_and_accessed_together() {
        let pair = Timestamps::new(t(0));
        assert_eq!(pair.opened_at(), t(0));
        assert_eq!(pair.accessed_at(), t(0));
    }

    #[test]
    fn opening_later_pulls_access_forward() {
        let mut pair = Timestamps::from_pair(t(0), t(5));
        pair.set_opened_at(t(10));
        assert_eq!(pair.opened_at(), t(10));
        assert_eq!(pair.accessed_at(), t(10));
    }

    #[test]
    fn opening_earlier_keeps_access() {
        let mut pair = Timestamps::from_pair(t(5), t(10));
        pair.set_opened_at(t(0));
        assert_eq!(pair.opened_at(), t(0));
        assert_eq!(pair.accessed_at(), t(10));
    }

    #[test]
    fn access_before_open_is_clamped() {
        let mut pair = Timestamps::new(t(10));
        pair.set_accessed_at(t(3));
        assert_eq!(pair.accessed_at(), t(10));
    }

    #[test]
    fn from_pair_clamps_inverted_input() {
        let pair = Timestamps::from_pair(t(10), t(1));
        assert_eq!(pair.accessed_at(), t(10));
    }

    #[test]
    fn invariant_holds_under_any_setter_order() {
        let values = [t(7), t(2), t(9), t(0), t(4), t(4), t(11)];
        let mut pair = Timestamps::new(t(5));
        for (i, value) in values.iter().enumerate() {
            if i % 2 == 0 {
                pair.set_opened_at(*value);
            } else {
                pair.set_accessed_at(*value);
            }
            assert!(pair.opened_at() <= pair.accessed_at(), "step {i}");
        }
    }
}
