//! Badges and milestones earned from journaling habits.

use super::accessors::{dated_days, flatten_entries, tracked_days};
use crate::model::{MoodData, TimeOfDay};

/// Notes longer than this count as detailed reflections.
pub const DETAILED_NOTE_CHARS: usize = 50;

/// A badge and whether it has been earned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub title: &'static str,
    pub description: &'static str,
    pub current: usize,
    pub threshold: usize,
}

impl Badge {
    pub fn earned(&self) -> bool {
        self.current >= self.threshold
    }
}

pub fn badges(data: &MoodData) -> Vec<Badge> {
    let days = tracked_days(data);
    let days_tracking = match (days.first(), days.last()) {
        (Some(first), Some(last)) => (last.date - first.date).num_days() as usize + 1,
        _ => 0,
    };

    let entries = flatten_entries(data);
    let positive_in = |slot: TimeOfDay| {
        entries
            .iter()
            .filter(|e| e.time_of_day == slot && e.level.is_positive())
            .count()
    };
    let detailed_notes = entries
        .iter()
        .filter(|e| {
            e.note
                .as_deref()
                .is_some_and(|n| n.chars().count() > DETAILED_NOTE_CHARS)
        })
        .count();

    vec![
        Badge {
            title: "Veteran Tracker",
            description: "30+ days of mood tracking",
            current: days_tracking,
            threshold: 30,
        },
        Badge {
            title: "Morning Person",
            description: "15+ positive morning moods",
            current: positive_in(TimeOfDay::Morning),
            threshold: 15,
        },
        Badge {
            title: "Night Owl",
            description: "15+ positive night moods",
            current: positive_in(TimeOfDay::Night),
            threshold: 15,
        },
        Badge {
            title: "Deep Thinker",
            description: "10+ detailed mood reflections",
            current: detailed_notes,
            threshold: 10,
        },
    ]
}

/// Long-term progress toward a fixed target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub title: &'static str,
    pub description: &'static str,
    pub current: usize,
    pub target: usize,
}

impl Milestone {
    /// Progress in percent, capped at 100.
    pub fn progress_percent(&self) -> f64 {
        if self.target == 0 {
            return 100.0;
        }
        (self.current as f64 / self.target as f64 * 100.0).min(100.0)
    }

    pub fn is_completed(&self) -> bool {
        self.current >= self.target
    }
}

pub fn milestones(data: &MoodData) -> Vec<Milestone> {
    let days = dated_days(data);
    let entries = flatten_entries(data);

    let tracked = days.iter().filter(|(_, e)| !e.is_empty()).count();
    let reflective = days
        .iter()
        .filter(|(_, e)| e.values().any(|entry| entry.note_text().is_some()))
        .count();

    vec![
        Milestone {
            title: "Tracking Master",
            description: "Total mood entries logged",
            current: entries.len(),
            target: 100,
        },
        Milestone {
            title: "Positivity Champion",
            description: "Positive mood entries recorded",
            current: entries.iter().filter(|e| e.level.is_positive()).count(),
            target: 50,
        },
        Milestone {
            title: "Consistency King",
            description: "Days of tracking completed",
            current: tracked.min(30),
            target: 30,
        },
        Milestone {
            title: "Reflection Warrior",
            description: "Days with reflective notes",
            current: reflective,
            target: 20,
        },
    ]
}

#[cfg(test)]
mod tests {
    use chrono::{Duration as ChronoDuration, NaiveDate};

    use super::*;
    use crate::model::{DayEntries, MoodLevel};

    fn start() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
    }

    fn find<'a, T>(items: &'a [T], title: &str, get: impl Fn(&T) -> &str) -> &'a T {
        items.iter().find(|i| get(i) == title).unwrap()
    }

    #[test]
    fn test_badges_empty_journal() {
        let badges = badges(&MoodData::new());
        assert_eq!(badges.len(), 4);
        assert!(badges.iter().all(|b| b.current == 0 && !b.earned()));
    }

    #[test]
    fn test_veteran_counts_calendar_span() {
        let mut data = MoodData::new();
        data.save_mood(start(), TimeOfDay::Morning, MoodLevel::new(3).unwrap(), None);
        data.save_mood(
            start() + ChronoDuration::days(29),
            TimeOfDay::Morning,
            MoodLevel::new(3).unwrap(),
            None,
        );

        let badges = badges(&data);
        let veteran = find(&badges, "Veteran Tracker", |b| b.title);
        assert_eq!(veteran.current, 30);
        assert!(veteran.earned());
    }

    #[test]
    fn test_veteran_span_ignores_empty_buckets() {
        let mut data = MoodData::new();
        data.save_mood(start(), TimeOfDay::Morning, MoodLevel::new(3).unwrap(), None);
        let data: MoodData = data
            .iter()
            .map(|(key, entries)| (key.to_string(), entries.clone()))
            .chain([("2024-03-01".to_string(), DayEntries::new())])
            .collect();

        let badges = badges(&data);
        assert_eq!(find(&badges, "Veteran Tracker", |b| b.title).current, 1);
    }

    #[test]
    fn test_slot_and_note_badges() {
        let mut data = MoodData::new();
        let long_note = "x".repeat(DETAILED_NOTE_CHARS + 1);
        for i in 0..15 {
            let day = start() + ChronoDuration::days(i);
            data.save_mood(day, TimeOfDay::Morning, MoodLevel::new(4).unwrap(), None);
            data.save_mood(day, TimeOfDay::Night, MoodLevel::new(3).unwrap(), Some(long_note.clone()));
        }

        let badges = badges(&data);
        assert!(find(&badges, "Morning Person", |b| b.title).earned());
        assert_eq!(find(&badges, "Night Owl", |b| b.title).current, 0);
        assert!(find(&badges, "Deep Thinker", |b| b.title).earned());
    }

    #[test]
    fn test_milestones_progress() {
        let mut data = MoodData::new();
        for i in 0..40 {
            let day = start() + ChronoDuration::days(i);
            let note = (i < 5).then(|| "thoughts".to_string());
            data.save_mood(day, TimeOfDay::FullDay, MoodLevel::new(5).unwrap(), note);
        }

        let milestones = milestones(&data);
        let entries = find(&milestones, "Tracking Master", |m| m.title);
        assert_eq!(entries.current, 40);
        assert_eq!(entries.progress_percent(), 40.0);

        let consistency = find(&milestones, "Consistency King", |m| m.title);
        assert_eq!(consistency.current, 30);
        assert!(consistency.is_completed());
        assert_eq!(consistency.progress_percent(), 100.0);

        assert_eq!(find(&milestones, "Reflection Warrior", |m| m.title).current, 5);
        assert_eq!(find(&milestones, "Positivity Champion", |m| m.title).current, 40);
    }
}
