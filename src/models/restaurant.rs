//! Restaurant directory entry model

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// A restaurant as it appears in the directory supplied by the caller.
///
/// Static attributes only; the restaurant's coordinate lives in a separate
/// remote location record and is fetched per pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Restaurant {
    /// Opaque unique identifier, also the remote document key
    pub id: String,
    pub name: String,
    /// Cuisine / establishment type (e.g. "Italian", "Cafe")
    pub cuisine: String,
    pub address: String,
    pub city: String,
    /// Average cost for two, display string as stored remotely
    pub average_cost: String,
    pub hours: OperatingHours,
}

/// Daily opening interval
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct OperatingHours {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl OperatingHours {
    #[must_use]
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        Self { open, close }
    }

    /// Whether the restaurant is open at the given time of day
    #[must_use]
    pub fn is_open_at(&self, time: NaiveTime) -> bool {
        if self.open <= self.close {
            time >= self.open && time < self.close
        } else {
            // Interval wraps past midnight
            time >= self.open || time < self.close
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hours(open: &str, close: &str) -> OperatingHours {
        OperatingHours::new(
            NaiveTime::parse_from_str(open, "%H:%M").unwrap(),
            NaiveTime::parse_from_str(close, "%H:%M").unwrap(),
        )
    }

    #[test]
    fn test_is_open_within_interval() {
        let h = hours("09:00", "22:00");
        assert!(h.is_open_at(NaiveTime::parse_from_str("12:30", "%H:%M").unwrap()));
        assert!(!h.is_open_at(NaiveTime::parse_from_str("23:00", "%H:%M").unwrap()));
    }

    #[test]
    fn test_is_open_wrapping_midnight() {
        let h = hours("18:00", "02:00");
        assert!(h.is_open_at(NaiveTime::parse_from_str("23:30", "%H:%M").unwrap()));
        assert!(h.is_open_at(NaiveTime::parse_from_str("01:00", "%H:%M").unwrap()));
        assert!(!h.is_open_at(NaiveTime::parse_from_str("12:00", "%H:%M").unwrap()));
    }
}
