//! Goal progress computed from the journal.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration as ChronoDuration, NaiveDate};
use serde::{Deserialize, Serialize};

use super::accessors::{dated_days, tracked_days};
use crate::error::ModelError;
use crate::model::MoodData;
use crate::traits::Clock;

/// Number of days the average and entries goals look back over.
pub const GOAL_WINDOW_DAYS: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalKind {
    /// Mean level of the last week's entries reaches the target.
    Average,
    /// Consecutive recent days whose average reaches the target.
    Streak,
    /// Days in the last week with at least `target` entries.
    Entries,
    /// Tracked by the user; not measurable from mood data.
    Custom,
}

impl GoalKind {
    pub const ALL: [GoalKind; 4] = [
        GoalKind::Average,
        GoalKind::Streak,
        GoalKind::Entries,
        GoalKind::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            GoalKind::Average => "average",
            GoalKind::Streak => "streak",
            GoalKind::Entries => "entries",
            GoalKind::Custom => "custom",
        }
    }
}

impl fmt::Display for GoalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GoalKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        GoalKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == normalized)
            .ok_or_else(|| ModelError::InvalidGoalKind(s.to_string()))
    }
}

/// A user-defined target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub kind: GoalKind,
    pub target: f64,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<NaiveDate>,
}

impl Goal {
    /// Create a goal without a deadline.
    ///
    /// # Arguments
    /// * `kind` - What is measured
    /// * `target` - Mean level, streak length in days, or entries per day, depending on `kind`
    /// * `description` - Free text shown alongside the progress
    pub fn new(kind: GoalKind, target: f64, description: impl Into<String>) -> Self {
        Self {
            kind,
            target,
            description: description.into(),
            deadline: None,
        }
    }

    pub fn with_deadline(mut self, deadline: NaiveDate) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalProgress {
    /// Percentage in [0, 100].
    pub progress: f64,
    pub achieved: bool,
}

impl GoalProgress {
    fn from_percent(progress: f64) -> Self {
        let progress = progress.clamp(0.0, 100.0);
        Self {
            progress,
            achieved: progress >= 100.0,
        }
    }
}

/// Goal progress using the system clock.
pub fn goal_progress(goal: &Goal, data: &MoodData) -> GoalProgress {
    goal_progress_with_clock(goal, data, &crate::traits::SystemClock)
}

/// Goal progress relative to `clock`'s today.
///
/// Only the entries goal depends on the calendar; the others are measured
/// against the tracked days themselves.
pub fn goal_progress_with_clock<C: Clock>(goal: &Goal, data: &MoodData, clock: &C) -> GoalProgress {
    if goal.target.is_nan() || goal.target <= 0.0 {
        return GoalProgress::from_percent(0.0);
    }

    let percent = match goal.kind {
        GoalKind::Average => average_progress(data, goal.target),
        GoalKind::Streak => streak_progress(data, goal.target),
        GoalKind::Entries => entries_progress(data, goal.target, clock.today()),
        GoalKind::Custom => 0.0,
    };

    tracing::debug!("Goal {} ({}): {:.1}%", goal.kind, goal.target, percent);
    GoalProgress::from_percent(percent)
}

fn average_progress(data: &MoodData, target: f64) -> f64 {
    let days: Vec<_> = dated_days(data)
        .into_iter()
        .filter(|(_, entries)| !entries.is_empty())
        .collect();
    let recent = &days[days.len().saturating_sub(GOAL_WINDOW_DAYS)..];

    let levels: Vec<f64> = recent
        .iter()
        .flat_map(|(_, entries)| entries.values().map(|e| e.level.as_f64()))
        .collect();

    if levels.is_empty() {
        return 0.0;
    }
    let average = levels.iter().sum::<f64>() / levels.len() as f64;
    (average / target * 100.0).min(100.0)
}

fn streak_progress(data: &MoodData, target: f64) -> f64 {
    let streak = tracked_days(data)
        .iter()
        .rev()
        .take_while(|day| day.average >= target)
        .count();
    (streak as f64 / target * 100.0).min(100.0)
}

fn entries_progress(data: &MoodData, target: f64, today: NaiveDate) -> f64 {
    let completed = (0..GOAL_WINDOW_DAYS)
        .filter_map(|i| today.checked_sub_signed(ChronoDuration::days(i as i64)))
        .filter(|date| data.entry_count(*date) as f64 >= target)
        .count();
    completed as f64 / GOAL_WINDOW_DAYS as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DayEntries, MoodLevel, TimeOfDay};
    use crate::traits::MockClock;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn record(data: &mut MoodData, day: NaiveDate, slot: TimeOfDay, v: u8) {
        data.save_mood(day, slot, MoodLevel::new(v).unwrap(), None);
    }

    fn daily(start: NaiveDate, levels: &[u8]) -> MoodData {
        let mut data = MoodData::new();
        for (i, v) in levels.iter().enumerate() {
            record(&mut data, start + ChronoDuration::days(i as i64), TimeOfDay::FullDay, *v);
        }
        data
    }

    fn progress(kind: GoalKind, target: f64, data: &MoodData, today: NaiveDate) -> GoalProgress {
        goal_progress_with_clock(&Goal::new(kind, target, "test"), data, &MockClock::on_date(today))
    }

    // ==================== GoalKind Tests ====================

    #[test]
    fn test_goal_kind_parse() {
        assert_eq!("Average".parse::<GoalKind>().unwrap(), GoalKind::Average);
        assert_eq!(" streak ".parse::<GoalKind>().unwrap(), GoalKind::Streak);
        assert!(matches!(
            "weekly".parse::<GoalKind>(),
            Err(ModelError::InvalidGoalKind(_))
        ));
    }

    #[test]
    fn test_goal_serializes_lowercase_kind() {
        let goal = Goal::new(GoalKind::Entries, 2.0, "log twice a day");
        let json = serde_json::to_value(&goal).unwrap();
        assert_eq!(json["kind"], "entries");
        assert!(json.get("deadline").is_none());
    }

    // ==================== Average Goal Tests ====================

    #[test]
    fn test_average_goal_met() {
        let today = date(2024, 1, 7);
        let data = daily(date(2024, 1, 1), &[4; 7]);
        let result = progress(GoalKind::Average, 4.0, &data, today);
        assert_eq!(result.progress, 100.0);
        assert!(result.achieved);

        let data = daily(date(2024, 1, 1), &[5; 7]);
        assert_eq!(progress(GoalKind::Average, 4.0, &data, today).progress, 100.0);
    }

    #[test]
    fn test_average_goal_partial_uses_last_seven_days() {
        let mut data = daily(date(2024, 1, 1), &[2; 7]);
        // Older day outside the window must not count.
        record(&mut data, date(2023, 12, 1), TimeOfDay::Morning, 5);

        let result = progress(GoalKind::Average, 4.0, &data, date(2024, 1, 7));
        assert_eq!(result.progress, 50.0);
        assert!(!result.achieved);
    }

    #[test]
    fn test_average_goal_empty_is_zero() {
        let result = progress(GoalKind::Average, 4.0, &MoodData::new(), date(2024, 1, 1));
        assert_eq!(result.progress, 0.0);
    }

    #[test]
    fn test_average_goal_skips_empty_day_buckets() {
        // One real day followed by a week of empty buckets.
        let data: MoodData = daily(date(2024, 1, 1), &[4])
            .iter()
            .map(|(key, entries)| (key.to_string(), entries.clone()))
            .chain((2..=8).map(|d| (format!("2024-01-0{d}"), DayEntries::new())))
            .collect();

        let result = progress(GoalKind::Average, 4.0, &data, date(2024, 1, 8));
        assert_eq!(result.progress, 100.0);
        assert!(result.achieved);
    }

    // ==================== Streak Goal Tests ====================

    #[test]
    fn test_streak_goal_counts_from_latest_day() {
        let data = daily(date(2024, 1, 1), &[5, 2, 4, 4, 5]);
        let result = progress(GoalKind::Streak, 4.0, &data, date(2024, 1, 5));
        // Three qualifying days before the 2 breaks the run.
        assert_eq!(result.progress, 75.0);
    }

    #[test]
    fn test_streak_goal_capped() {
        let data = daily(date(2024, 1, 1), &[5; 10]);
        assert_eq!(progress(GoalKind::Streak, 3.0, &data, date(2024, 1, 10)).progress, 100.0);
    }

    // ==================== Entries Goal Tests ====================

    #[test]
    fn test_entries_goal_counts_calendar_week() {
        let today = date(2024, 1, 10);
        let mut data = MoodData::new();
        for offset in 0..4 {
            let day = today - ChronoDuration::days(offset);
            record(&mut data, day, TimeOfDay::Morning, 3);
            record(&mut data, day, TimeOfDay::Evening, 3);
        }
        // Two entries but eight days ago.
        record(&mut data, date(2024, 1, 2), TimeOfDay::Morning, 3);
        record(&mut data, date(2024, 1, 2), TimeOfDay::Night, 3);

        let result = progress(GoalKind::Entries, 2.0, &data, today);
        assert!((result.progress - 4.0 / 7.0 * 100.0).abs() < 1e-9);
    }

    // ==================== Edge Case Tests ====================

    #[test]
    fn test_custom_and_invalid_targets_are_zero() {
        let data = daily(date(2024, 1, 1), &[5; 7]);
        let today = date(2024, 1, 7);

        assert_eq!(progress(GoalKind::Custom, 1.0, &data, today).progress, 0.0);
        assert_eq!(progress(GoalKind::Average, 0.0, &data, today).progress, 0.0);
        assert_eq!(progress(GoalKind::Streak, -2.0, &data, today).progress, 0.0);
        assert_eq!(progress(GoalKind::Average, f64::NAN, &data, today).progress, 0.0);
    }
}
