use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A playing field with an optional availability window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Court {
    pub id: Uuid,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_start: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_end: Option<DateTime<Utc>>,
}

impl Court {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            availability_start: None,
            availability_end: None,
        }
    }

    pub fn with_availability(
        name: impl Into<String>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Self {
        let mut court = Self::new(name);
        court.availability_start = Some(start);
        court.availability_end = Some(end);
        court
    }

    /// True when the whole `[start, end)` slot fits in the availability
    /// window. Unset bounds are open.
    pub fn available_during(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        if let Some(available_from) = self.availability_start {
            if start < available_from {
                return false;
            }
        }
        if let Some(available_until) = self.availability_end {
            if end > available_until {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn open_court_is_always_available() {
        let court = Court::new("Center");
        let start = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        assert!(court.available_during(start, start + chrono::Duration::hours(2)));
    }

    #[test]
    fn slot_must_fit_entirely_in_window() {
        let open = Utc.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap();
        let close = Utc.with_ymd_and_hms(2024, 6, 1, 18, 0, 0).unwrap();
        let court = Court::with_availability("Side", open, close);
        assert!(court.available_during(open, close));
        assert!(!court.available_during(open - chrono::Duration::minutes(1), close));
        assert!(!court.available_during(open, close + chrono::Duration::minutes(1)));
    }
}
