//! Mood journal data model.
//!
//! A [`MoodData`] snapshot maps calendar days (`yyyy-MM-dd` keys) to at most one
//! [`MoodEntry`] per [`TimeOfDay`] slot. The JSON form matches the journal's
//! persisted layout:
//!
//! ```json
//! { "2024-03-01": { "morning": { "level": 5, "timeOfDay": "morning" } } }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// Format of the day keys in [`MoodData`].
pub const DATE_KEY_FORMAT: &str = "%Y-%m-%d";

// ==================== Mood Level ====================

/// Ordinal mood rating, always within 1..=5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct MoodLevel(u8);

impl MoodLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Create a level, rejecting values outside 1..=5.
    pub fn new(value: u8) -> Result<Self, ModelError> {
        Self::try_from(i64::from(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    /// Anything above "Okay" counts as a positive mood.
    pub fn is_positive(self) -> bool {
        self.0 > 3
    }

    pub fn description(self) -> &'static str {
        match self.0 {
            1 => "Very Bad",
            2 => "Bad",
            3 => "Okay",
            4 => "Good",
            _ => "Excellent",
        }
    }
}

impl TryFrom<i64> for MoodLevel {
    type Error = ModelError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(ModelError::InvalidLevel(value))
        }
    }
}

impl From<MoodLevel> for u8 {
    fn from(level: MoodLevel) -> Self {
        level.0
    }
}

impl FromStr for MoodLevel {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s
            .trim()
            .parse()
            .map_err(|_| ModelError::UnparsableLevel(s.to_string()))?;
        Self::try_from(value)
    }
}

impl fmt::Display for MoodLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.0, self.description())
    }
}

// ==================== Time of Day ====================

/// Slot of the day an entry is recorded under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
    FullDay,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 5] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
        TimeOfDay::FullDay,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "morning",
            TimeOfDay::Afternoon => "afternoon",
            TimeOfDay::Evening => "evening",
            TimeOfDay::Night => "night",
            TimeOfDay::FullDay => "full-day",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning (6AM-12PM)",
            TimeOfDay::Afternoon => "Afternoon (12PM-5PM)",
            TimeOfDay::Evening => "Evening (5PM-9PM)",
            TimeOfDay::Night => "Night (9PM-6AM)",
            TimeOfDay::FullDay => "Full Day",
        }
    }
}

impl FromStr for TimeOfDay {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        TimeOfDay::ALL
            .into_iter()
            .find(|slot| slot.as_str() == normalized)
            .ok_or_else(|| ModelError::InvalidTimeOfDay(s.to_string()))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Entries ====================

/// Optional structured check-in attached to an entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Questionnaire {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sleep_quality: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub symptoms: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub triggers: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Questionnaire {
    /// Names of the triggers flagged as present.
    pub fn active_triggers(&self) -> impl Iterator<Item = &str> {
        self.triggers
            .iter()
            .filter(|(_, on)| **on)
            .map(|(name, _)| name.as_str())
    }
}

/// One recorded mood observation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoodEntry {
    pub level: MoodLevel,
    pub time_of_day: TimeOfDay,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questionnaire: Option<Questionnaire>,
}

impl MoodEntry {
    pub fn new(time_of_day: TimeOfDay, level: MoodLevel) -> Self {
        Self {
            level,
            time_of_day,
            note: None,
            questionnaire: None,
        }
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn with_questionnaire(mut self, questionnaire: Questionnaire) -> Self {
        self.questionnaire = Some(questionnaire);
        self
    }

    /// The note, if present and not blank.
    pub fn note_text(&self) -> Option<&str> {
        self.note.as_deref().filter(|n| !n.is_empty())
    }
}

/// Entries recorded on a single day, keyed by slot.
pub type DayEntries = BTreeMap<TimeOfDay, MoodEntry>;

// ==================== Mood Data ====================

/// Snapshot of the whole journal.
///
/// Keys are kept as strings so snapshots with damaged keys still load; the
/// analytics skip any key that does not parse as a date.
///
/// On load, each entry's `timeOfDay` is taken from the slot key it is stored
/// under, so a day never reports two entries for the same slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(
    from = "BTreeMap<String, DayEntries>",
    into = "BTreeMap<String, DayEntries>"
)]
pub struct MoodData {
    days: BTreeMap<String, DayEntries>,
}

impl MoodData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a mood for a date and slot, replacing any previous entry there.
    ///
    /// Returns the replaced entry.
    pub fn save_mood(
        &mut self,
        date: NaiveDate,
        time_of_day: TimeOfDay,
        level: MoodLevel,
        note: Option<String>,
    ) -> Option<MoodEntry> {
        let entry = MoodEntry {
            note,
            ..MoodEntry::new(time_of_day, level)
        };
        self.upsert_entry(date, entry)
    }

    /// Store a fully built entry under its own slot (last write wins).
    pub fn upsert_entry(&mut self, date: NaiveDate, entry: MoodEntry) -> Option<MoodEntry> {
        self.days
            .entry(date_key(date))
            .or_default()
            .insert(entry.time_of_day, entry)
    }

    /// Remove every entry recorded on `date`. Returns whether the day existed.
    pub fn reset_day(&mut self, date: NaiveDate) -> bool {
        self.days.remove(&date_key(date)).is_some()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayEntries> {
        self.days.get(&date_key(date))
    }

    /// Number of entries recorded on `date`.
    pub fn entry_count(&self, date: NaiveDate) -> usize {
        self.day(date).map_or(0, BTreeMap::len)
    }

    /// Raw `(key, entries)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &DayEntries)> {
        self.days.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of day buckets, including malformed keys.
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl From<BTreeMap<String, DayEntries>> for MoodData {
    fn from(mut days: BTreeMap<String, DayEntries>) -> Self {
        for (key, entries) in days.iter_mut() {
            for (slot, entry) in entries.iter_mut() {
                if entry.time_of_day != *slot {
                    tracing::warn!(
                        "Entry on {} stored under {} claims {}, keeping {}",
                        key,
                        slot,
                        entry.time_of_day,
                        slot
                    );
                    entry.time_of_day = *slot;
                }
            }
        }
        Self { days }
    }
}

impl From<MoodData> for BTreeMap<String, DayEntries> {
    fn from(data: MoodData) -> Self {
        data.days
    }
}

impl FromIterator<(String, DayEntries)> for MoodData {
    fn from_iter<T: IntoIterator<Item = (String, DayEntries)>>(iter: T) -> Self {
        Self::from(iter.into_iter().collect::<BTreeMap<_, _>>())
    }
}

/// Format a date as a journal day key.
pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_KEY_FORMAT).to_string()
}

/// Parse a journal day key.
pub fn parse_date_key(key: &str) -> Result<NaiveDate, ModelError> {
    NaiveDate::parse_from_str(key, DATE_KEY_FORMAT)
        .map_err(|_| ModelError::InvalidDate(key.to_string()))
}
