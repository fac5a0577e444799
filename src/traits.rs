//! Abstractions over wall-clock time.
//!
//! Most analytics are relative to the data itself, but a few (entry goals,
//! the active streak, recent activity) look at "today". They take a `Clock`
//! so tests can pin the date.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};

/// Trait for abstracting time access.
pub trait Clock: Send + Sync {
    /// Get the current time in UTC.
    fn now_utc(&self) -> DateTime<Utc>;

    /// Get the current time in the local timezone.
    fn now_local(&self) -> DateTime<Local>;

    /// The calendar day the journal considers "today".
    fn today(&self) -> NaiveDate {
        self.now_local().date_naive()
    }
}

/// System clock implementation using real time.
#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn now_local(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Mock clock for testing with controllable time.
///
/// `today()` is the UTC date of the mocked instant so results do not depend
/// on the timezone of the machine running the tests.
#[derive(Debug, Clone)]
pub struct MockClock {
    utc_time: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a new mock clock set to the given UTC time.
    ///
    /// # Arguments
    /// * `time` - Initial instant; `today()` reports its UTC date
    pub fn new(time: DateTime<Utc>) -> Self {
        Self {
            utc_time: Arc::new(Mutex::new(time)),
        }
    }

    /// Create a mock clock at noon UTC on `date`.
    ///
    /// # Arguments
    /// * `date` - Calendar day the clock reports as today
    pub fn on_date(date: NaiveDate) -> Self {
        Self::new(date.and_time(NaiveTime::MIN).and_utc() + chrono::Duration::hours(12))
    }

    /// Set the mock clock to a new time.
    pub fn set_time(&self, time: DateTime<Utc>) {
        *self.utc_time.lock().unwrap() = time;
    }

    /// Advance the clock by a duration.
    pub fn advance(&self, duration: chrono::Duration) {
        let mut time = self.utc_time.lock().unwrap();
        *time += duration;
    }
}

impl Clock for MockClock {
    fn now_utc(&self) -> DateTime<Utc> {
        *self.utc_time.lock().unwrap()
    }

    fn now_local(&self) -> DateTime<Local> {
        self.now_utc().with_timezone(&Local)
    }

    fn today(&self) -> NaiveDate {
        self.now_utc().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn test_system_clock_returns_current_time() {
        let clock = SystemClock;
        let before = Utc::now();
        let clock_time = clock.now_utc();
        let after = Utc::now();

        assert!(clock_time >= before);
        assert!(clock_time <= after);
    }

    #[test]
    fn test_mock_clock_returns_set_time() {
        let fixed_time = Utc.with_ymd_and_hms(2024, 6, 15, 14, 30, 0).unwrap();
        let clock = MockClock::new(fixed_time);

        assert_eq!(clock.now_utc(), fixed_time);
    }

    #[test]
    fn test_mock_clock_on_date_reports_that_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 2).unwrap();
        let clock = MockClock::on_date(date);

        assert_eq!(clock.today(), date);
    }

    #[test]
    fn test_mock_clock_can_be_updated() {
        let time1 = Utc.with_ymd_and_hms(2024, 6, 15, 10, 0, 0).unwrap();
        let time2 = Utc.with_ymd_and_hms(2024, 6, 16, 14, 0, 0).unwrap();

        let clock = MockClock::new(time1);
        assert_eq!(clock.today(), time1.date_naive());

        clock.set_time(time2);
        assert_eq!(clock.now_utc(), time2);
        assert_eq!(clock.today(), time2.date_naive());
    }

    #[test]
    fn test_mock_clock_advance_crosses_midnight() {
        let start = Utc.with_ymd_and_hms(2024, 12, 31, 22, 0, 0).unwrap();
        let clock = MockClock::new(start);

        clock.advance(chrono::Duration::hours(3));

        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }
}
