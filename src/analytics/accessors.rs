//! Flat views over the nested journal map.
//!
//! Every other analytics module reads the journal through these helpers, so
//! malformed day keys are dropped (with a warning) in exactly one place.

use chrono::NaiveDate;

use crate::model::{DayEntries, MoodData, MoodLevel, TimeOfDay, parse_date_key};

/// One entry with its day attached.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatEntry {
    pub date: NaiveDate,
    pub time_of_day: TimeOfDay,
    pub level: MoodLevel,
    pub note: Option<String>,
}

/// A day with at least one entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedDay {
    pub date: NaiveDate,
    /// Mean level across the day's entries.
    pub average: f64,
    pub entry_count: usize,
}

/// Inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        (self.start..=self.end).contains(&date)
    }
}

/// Days with parseable keys, ascending by date.
pub fn dated_days(data: &MoodData) -> Vec<(NaiveDate, &DayEntries)> {
    let mut days: Vec<_> = data
        .iter()
        .filter_map(|(key, entries)| match parse_date_key(key) {
            Ok(date) => Some((date, entries)),
            Err(e) => {
                tracing::warn!("Skipping journal day: {}", e);
                None
            }
        })
        .collect();
    days.sort_by_key(|(date, _)| *date);
    days
}

/// Mean level of one day's entries, `None` when the day is empty.
pub fn daily_average(entries: &DayEntries) -> Option<f64> {
    if entries.is_empty() {
        return None;
    }
    let sum: f64 = entries.values().map(|e| e.level.as_f64()).sum();
    Some(sum / entries.len() as f64)
}

/// Every entry in the journal, ordered by date then slot.
pub fn flatten_entries(data: &MoodData) -> Vec<FlatEntry> {
    dated_days(data)
        .into_iter()
        .flat_map(|(date, entries)| {
            entries.values().map(move |entry| FlatEntry {
                date,
                time_of_day: entry.time_of_day,
                level: entry.level,
                note: entry.note.clone(),
            })
        })
        .collect()
}

/// Days that have entries, ascending by date.
pub fn tracked_days(data: &MoodData) -> Vec<TrackedDay> {
    dated_days(data)
        .into_iter()
        .filter_map(|(date, entries)| {
            daily_average(entries).map(|average| TrackedDay {
                date,
                average,
                entry_count: entries.len(),
            })
        })
        .collect()
}

/// Daily averages of the tracked days, oldest first.
pub fn daily_averages(data: &MoodData) -> Vec<f64> {
    tracked_days(data).into_iter().map(|d| d.average).collect()
}
