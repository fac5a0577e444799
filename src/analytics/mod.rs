//! Mood aggregation engine.
//!
//! Everything here is a pure function of a [`MoodData`] snapshot (plus "today"
//! for the few calendar-relative metrics). Layers build on each other:
//!
//! - [`accessors`]: flat and per-day views of the nested journal map
//! - [`stats`]: averages, distributions, variance, correlations
//! - [`temporal`]: streaks, recent activity, moving-average prediction
//! - [`goals`]: progress toward user goals
//! - [`insights`]: heuristic patterns and recommendations
//! - [`achievements`]: badges and milestones
//!
//! [`MoodReport`] runs all of them in one pass for display.

pub mod accessors;
pub mod achievements;
pub mod goals;
pub mod insights;
pub mod stats;
pub mod temporal;

use chrono::NaiveDate;

pub use accessors::{
    DateRange, FlatEntry, TrackedDay, daily_average, daily_averages, dated_days, flatten_entries,
    tracked_days,
};
pub use achievements::{Badge, Milestone, badges, milestones};
pub use goals::{Goal, GoalKind, GoalProgress, goal_progress, goal_progress_with_clock};
pub use insights::{
    Impact, Pattern, PatternKind, Recommendation, analyze_patterns, recommendations,
};
pub use stats::{
    MoodDistribution, MoodStats, Season, SeasonAverage, SlotCorrelation, TimeOfDayAverage,
    TriggerImpact, WeekdayAverage, consecutive_day_correlations, correlation, distribution,
    is_unstable, overall_average, seasonal_breakdown, summary_stats, time_of_day_breakdown,
    trigger_impact, variance, weekday_breakdown,
};
pub use temporal::{
    DayActivity, MoodPrediction, PredictionPoint, StreakSummary, Trend, active_streak,
    perfect_days, predict, recent_activity, streaks,
};

use crate::config::AnalyticsConfig;
use crate::model::MoodData;
use crate::traits::Clock;

/// Round to two decimal places.
pub(crate) fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Windows used by the calendar-relative parts of a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    /// Trailing tracked days feeding the prediction.
    pub prediction_window: usize,
    /// Calendar days shown in recent activity.
    pub recent_activity_days: usize,
    /// Calendar days searched for the stability check.
    pub instability_lookback_days: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            prediction_window: temporal::DEFAULT_PREDICTION_WINDOW,
            recent_activity_days: 14,
            instability_lookback_days: 30,
        }
    }
}

impl From<&AnalyticsConfig> for ReportOptions {
    fn from(config: &AnalyticsConfig) -> Self {
        Self {
            prediction_window: config.prediction_window_days,
            recent_activity_days: config.recent_activity_days,
            instability_lookback_days: config.instability_lookback_days,
        }
    }
}

/// Every aggregate for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodReport {
    pub today: NaiveDate,
    pub entry_count: usize,
    pub tracked_day_count: usize,
    pub overall_average: f64,
    /// Summary over daily averages.
    pub daily_stats: Option<MoodStats>,
    pub distribution: MoodDistribution,
    pub by_weekday: Vec<WeekdayAverage>,
    pub by_time_of_day: Vec<TimeOfDayAverage>,
    pub by_season: Vec<SeasonAverage>,
    pub slot_correlations: Vec<SlotCorrelation>,
    pub triggers: Vec<TriggerImpact>,
    pub streaks: StreakSummary,
    pub active_streak: u32,
    pub perfect_days: usize,
    pub recent_activity: Vec<DayActivity>,
    pub prediction: Option<MoodPrediction>,
    pub patterns: Vec<Pattern>,
    pub recommendations: Vec<Recommendation>,
    pub badges: Vec<Badge>,
    pub milestones: Vec<Milestone>,
}

impl MoodReport {
    pub fn build<C: Clock>(data: &MoodData, options: &ReportOptions, clock: &C) -> Self {
        let today = clock.today();
        let days = tracked_days(data);
        let averages: Vec<f64> = days.iter().map(|d| d.average).collect();

        let report = Self {
            today,
            entry_count: days.iter().map(|d| d.entry_count).sum(),
            tracked_day_count: days.len(),
            overall_average: overall_average(data, None),
            daily_stats: summary_stats(&averages),
            distribution: distribution(data),
            by_weekday: weekday_breakdown(data),
            by_time_of_day: time_of_day_breakdown(data),
            by_season: seasonal_breakdown(data),
            slot_correlations: consecutive_day_correlations(data),
            triggers: trigger_impact(data),
            streaks: streaks(data),
            active_streak: active_streak(data, today),
            perfect_days: perfect_days(data),
            recent_activity: recent_activity(data, today, options.recent_activity_days),
            prediction: predict(data, options.prediction_window),
            patterns: analyze_patterns(data, today, options),
            recommendations: recommendations(data, today, options),
            badges: badges(data),
            milestones: milestones(data),
        };

        tracing::debug!(
            "Built report for {}: {} entries over {} days, {} patterns",
            today,
            report.entry_count,
            report.tracked_day_count,
            report.patterns.len()
        );
        report
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }
}
