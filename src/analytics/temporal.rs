//! Streaks and moving-average predictions over consecutive days.

use std::collections::BTreeSet;

use chrono::{Duration as ChronoDuration, NaiveDate};

use super::accessors::{dated_days, tracked_days};
use super::round2;
use crate::model::MoodData;

/// Daily average a day must exceed to count toward a positive streak.
pub const POSITIVE_DAY_THRESHOLD: f64 = 3.0;

/// Default number of trailing days feeding a prediction.
pub const DEFAULT_PREDICTION_WINDOW: usize = 7;

/// Largest possible gap between two levels, used to scale prediction error.
const LEVEL_SPAN: f64 = 4.0;

// ==================== Streaks ====================

/// Tracking and positive-mood streaks, measured over the data itself.
///
/// A run of consecutive calendar days counts each day, so a day following a
/// gap starts a new run of 1. Positive runs drop to 0 on any day whose
/// average is at or below [`POSITIVE_DAY_THRESHOLD`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreakSummary {
    /// Run of consecutive tracked days ending at the most recent one.
    pub current: u32,
    pub longest: u32,
    /// Positive run ending at the most recent tracked day.
    pub current_positive: u32,
    pub longest_positive: u32,
}

pub fn streaks(data: &MoodData) -> StreakSummary {
    let mut summary = StreakSummary::default();
    let mut previous: Option<NaiveDate> = None;

    for day in tracked_days(data) {
        let consecutive = previous.and_then(|p| p.succ_opt()) == Some(day.date);

        summary.current = if consecutive { summary.current + 1 } else { 1 };
        summary.longest = summary.longest.max(summary.current);

        summary.current_positive = if day.average > POSITIVE_DAY_THRESHOLD {
            if consecutive {
                summary.current_positive + 1
            } else {
                1
            }
        } else {
            0
        };
        summary.longest_positive = summary.longest_positive.max(summary.current_positive);

        previous = Some(day.date);
    }

    summary
}

/// Consecutive tracked days ending today.
///
/// A missing entry for `today` itself does not break the streak (the day is
/// not over yet); counting then starts from yesterday.
pub fn active_streak(data: &MoodData, today: NaiveDate) -> u32 {
    let tracked: BTreeSet<NaiveDate> = tracked_days(data).into_iter().map(|d| d.date).collect();

    let mut cursor = if tracked.contains(&today) {
        Some(today)
    } else {
        today.pred_opt()
    };

    let mut count = 0;
    while let Some(day) = cursor.filter(|d| tracked.contains(d)) {
        count += 1;
        cursor = day.pred_opt();
    }
    count
}

/// Whether a calendar day was tracked, and whether all of it was positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayActivity {
    pub date: NaiveDate,
    pub has_entry: bool,
    /// Every entry of the day was above "Okay". False for untracked days.
    pub is_positive: bool,
}

/// The last `days` calendar days ending at `today`, newest first.
pub fn recent_activity(data: &MoodData, today: NaiveDate, days: usize) -> Vec<DayActivity> {
    (0..days)
        .map_while(|i| today.checked_sub_signed(ChronoDuration::days(i as i64)))
        .map(|date| {
            let entries = data.day(date).filter(|e| !e.is_empty());
            DayActivity {
                date,
                has_entry: entries.is_some(),
                is_positive: entries
                    .is_some_and(|e| e.values().all(|entry| entry.level.is_positive())),
            }
        })
        .collect()
}

/// Days on which every entry was above "Okay".
pub fn perfect_days(data: &MoodData) -> usize {
    dated_days(data)
        .into_iter()
        .filter(|(_, entries)| {
            !entries.is_empty() && entries.values().all(|e| e.level.is_positive())
        })
        .count()
}

// ==================== Prediction ====================

/// Direction of the forecast relative to the latest day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    Improving,
    /// Also used when the forecast equals the latest day.
    Declining,
}

impl Trend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trend::Improving => "improving",
            Trend::Declining => "declining",
        }
    }
}

/// A reconstructed day: what the window before it predicted vs what happened.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionPoint {
    pub date: NaiveDate,
    pub actual: f64,
    pub predicted: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MoodPrediction {
    pub window: usize,
    pub points: Vec<PredictionPoint>,
    /// Mean of `1 - |actual - predicted| / 4` over `points`, as a percentage.
    /// `None` until there are more tracked days than the window.
    pub accuracy: Option<f64>,
    /// Predicted average for the day after the latest tracked day.
    pub forecast: f64,
    pub trend: Trend,
}

/// Linearly weighted mean, weights 1..=n from oldest to newest.
pub fn weighted_average(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let (sum, weights) = values
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sum, weights), (i, v)| {
            let w = (i + 1) as f64;
            (sum + v * w, weights + w)
        });
    Some(sum / weights)
}

/// Forecast tomorrow's mood from the trailing `window` daily averages.
///
/// Every tracked day that has a full window behind it is also reconstructed
/// to measure how well the method has done so far. Returns `None` when there
/// are no tracked days.
///
/// # Arguments
/// * `data` - Journal snapshot to read daily averages from
/// * `window` - Number of trailing days to weigh; `0` is treated as `1`
pub fn predict(data: &MoodData, window: usize) -> Option<MoodPrediction> {
    let window = window.max(1);
    let days = tracked_days(data);
    let averages: Vec<f64> = days.iter().map(|d| d.average).collect();
    let last_actual = *averages.last()?;

    let points: Vec<PredictionPoint> = (window..days.len())
        .filter_map(|i| {
            weighted_average(&averages[i - window..i]).map(|predicted| PredictionPoint {
                date: days[i].date,
                actual: averages[i],
                predicted: round2(predicted),
            })
        })
        .collect();

    let accuracy = (!points.is_empty()).then(|| {
        let total: f64 = points
            .iter()
            .map(|p| 1.0 - (p.actual - p.predicted).abs() / LEVEL_SPAN)
            .sum();
        total / points.len() as f64 * 100.0
    });

    let tail = &averages[averages.len().saturating_sub(window)..];
    let forecast = round2(weighted_average(tail)?);
    let trend = if forecast > last_actual {
        Trend::Improving
    } else {
        Trend::Declining
    };

    tracing::debug!(
        "Forecast {:.2} from {} days ({} reconstructed)",
        forecast,
        tail.len(),
        points.len()
    );

    Some(MoodPrediction {
        window,
        points,
        accuracy,
        forecast,
        trend,
    })
}
