//! Hours/minutes/seconds decomposition of second counts.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A second count split into hours, minutes and seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Hms {
    pub h: u64,
    pub m: u64,
    pub s: u64,
}

impl Hms {
    pub fn total_seconds(&self) -> u64 {
        hms_to_seconds(self.h, self.m, self.s)
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.h, self.m, self.s)
    }
}

pub fn seconds_to_hms(total_seconds: u64) -> Hms {
    Hms {
        h: total_seconds / 3600,
        m: (total_seconds % 3600) / 60,
        s: total_seconds % 60,
    }
}

/// Minutes and seconds above 59 are accepted and carried over.
///
/// Uses saturating arithmetic so absurd inputs clamp instead of wrapping.
pub fn hms_to_seconds(h: u64, m: u64, s: u64) -> u64 {
    h.saturating_mul(3600)
        .saturating_add(m.saturating_mul(60))
        .saturating_add(s)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decomposes_with_integer_division() {
        assert_eq!(seconds_to_hms(0), Hms { h: 0, m: 0, s: 0 });
        assert_eq!(seconds_to_hms(59), Hms { h: 0, m: 0, s: 59 });
        assert_eq!(seconds_to_hms(3661), Hms { h: 1, m: 1, s: 1 });
        assert_eq!(seconds_to_hms(90_000), Hms { h: 25, m: 0, s: 0 });
    }

    #[test]
    fn display_is_zero_padded() {
        assert_eq!(seconds_to_hms(30).to_string(), "00:00:30");
        assert_eq!(seconds_to_hms(3725).to_string(), "01:02:05");
    }

    #[test]
    fn overflowing_minutes_carry() {
        assert_eq!(hms_to_seconds(0, 90, 0), 5400);
        assert_eq!(seconds_to_hms(hms_to_seconds(0, 90, 0)), Hms { h: 1, m: 30, s: 0 });
    }

    proptest! {
        #[test]
        fn hms_roundtrip(t in 0u64..10_000_000_000) {
            let hms = seconds_to_hms(t);
            prop_assert_eq!(hms_to_seconds(hms.h, hms.m, hms.s), t);
            prop_assert!(hms.m < 60 && hms.s < 60);
        }
    }
}
