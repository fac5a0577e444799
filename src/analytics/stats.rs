//! Statistical aggregates over a journal snapshot.

use std::collections::BTreeMap;

use chrono::{Datelike, Weekday};

use super::accessors::{DateRange, dated_days, flatten_entries, tracked_days};
use super::round2;
use crate::model::{MoodData, MoodLevel, TimeOfDay};

/// Variance of recent daily averages above which mood counts as unstable.
pub const INSTABILITY_VARIANCE: f64 = 1.5;

// ==================== Basic Aggregates ====================

/// Arithmetic mean, `0.0` for an empty slice.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Mean level of every entry, optionally restricted to a date range.
pub fn overall_average(data: &MoodData, range: Option<DateRange>) -> f64 {
    let levels: Vec<f64> = flatten_entries(data)
        .into_iter()
        .filter(|e| range.is_none_or(|r| r.contains(e.date)))
        .map(|e| e.level.as_f64())
        .collect();
    mean(&levels)
}

/// Population variance (mean squared deviation), `0.0` for an empty slice.
pub fn variance(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|x| (x - m).powi(2)).sum::<f64>() / values.len() as f64
}

/// Whether a series of daily averages swings more than the instability threshold.
pub fn is_unstable(values: &[f64]) -> bool {
    variance(values) > INSTABILITY_VARIANCE
}

/// Pearson correlation coefficient.
///
/// Only the pairs both sequences have are used. Returns `0.0` when either
/// side has no variance or there is nothing to compare.
pub fn correlation(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return 0.0;
    }
    let (x, y) = (&x[..n], &y[..n]);
    let nf = n as f64;

    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = nf * sum_xy - sum_x * sum_y;
    let denominator = ((nf * sum_x2 - sum_x * sum_x) * (nf * sum_y2 - sum_y * sum_y)).sqrt();

    if denominator == 0.0 || !denominator.is_finite() {
        0.0
    } else {
        numerator / denominator
    }
}

/// Statistical summary of a numeric series.
#[derive(Debug, Clone, PartialEq)]
pub struct MoodStats {
    pub mean: f64,
    pub median: f64,
    pub std_dev: f64,
    pub min: f64,
    pub max: f64,
    pub sample_count: usize,
}

/// Summarize a series such as daily averages. `None` when empty.
pub fn summary_stats(values: &[f64]) -> Option<MoodStats> {
    if values.is_empty() {
        return None;
    }
    let n = values.len();

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };

    Some(MoodStats {
        mean: mean(values),
        median,
        std_dev: variance(values).sqrt(),
        min: sorted[0],
        max: sorted[n - 1],
        sample_count: n,
    })
}

// ==================== Distribution ====================

/// Number of entries at each level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoodDistribution {
    counts: [usize; 5],
}

impl MoodDistribution {
    pub fn count(&self, level: MoodLevel) -> usize {
        self.counts[usize::from(level.value()) - 1]
    }

    /// Counts for levels 1 through 5.
    pub fn counts(&self) -> [usize; 5] {
        self.counts
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    /// Share of entries at each level 1 through 5, in percent. All zero when empty.
    pub fn percentages(&self) -> [f64; 5] {
        let total = self.total();
        if total == 0 {
            return [0.0; 5];
        }
        self.counts.map(|c| c as f64 / total as f64 * 100.0)
    }

    pub fn percentage(&self, level: MoodLevel) -> f64 {
        self.percentages()[usize::from(level.value()) - 1]
    }
}

pub fn distribution(data: &MoodData) -> MoodDistribution {
    let mut dist = MoodDistribution::default();
    for entry in flatten_entries(data) {
        dist.counts[usize::from(entry.level.value()) - 1] += 1;
    }
    dist
}

// ==================== Breakdowns ====================

/// Average mood on one day of the week.
#[derive(Debug, Clone, PartialEq)]
pub struct WeekdayAverage {
    pub weekday: Weekday,
    pub day_name: &'static str,
    pub average: f64,
    pub entry_count: usize,
}

/// Average mood in one time-of-day slot.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeOfDayAverage {
    pub time_of_day: TimeOfDay,
    pub average: f64,
    pub entry_count: usize,
}

const WEEK_FROM_SUNDAY: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// Full English name of a weekday.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

/// Mean entry level per weekday, Sunday first. Days without data report 0.
pub fn weekday_breakdown(data: &MoodData) -> Vec<WeekdayAverage> {
    let mut buckets: [Vec<f64>; 7] = Default::default();
    for entry in flatten_entries(data) {
        let idx = entry.date.weekday().num_days_from_sunday() as usize;
        buckets[idx].push(entry.level.as_f64());
    }

    WEEK_FROM_SUNDAY
        .into_iter()
        .zip(buckets)
        .map(|(weekday, levels)| WeekdayAverage {
            weekday,
            day_name: weekday_name(weekday),
            average: mean(&levels),
            entry_count: levels.len(),
        })
        .collect()
}

/// Mean entry level per slot, in slot order. Slots without data report 0.
pub fn time_of_day_breakdown(data: &MoodData) -> Vec<TimeOfDayAverage> {
    let entries = flatten_entries(data);
    TimeOfDay::ALL
        .into_iter()
        .map(|slot| {
            let levels: Vec<f64> = entries
                .iter()
                .filter(|e| e.time_of_day == slot)
                .map(|e| e.level.as_f64())
                .collect();
            TimeOfDayAverage {
                time_of_day: slot,
                average: mean(&levels),
                entry_count: levels.len(),
            }
        })
        .collect()
}

// ==================== Seasons ====================

/// Meteorological season of a month in the northern hemisphere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Fall, Season::Winter];

    /// Season for a 1-based month number.
    pub fn from_month(month: u32) -> Season {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeasonAverage {
    pub season: Season,
    /// Mean of the daily averages that fall in the season.
    pub average: f64,
    pub day_count: usize,
}

pub fn seasonal_breakdown(data: &MoodData) -> Vec<SeasonAverage> {
    let days = tracked_days(data);
    Season::ALL
        .into_iter()
        .map(|season| {
            let averages: Vec<f64> = days
                .iter()
                .filter(|d| Season::from_month(d.date.month()) == season)
                .map(|d| d.average)
                .collect();
            SeasonAverage {
                season,
                average: mean(&averages),
                day_count: averages.len(),
            }
        })
        .collect()
}

// ==================== Correlations ====================

/// How well one day's mood in a slot predicts the next tracked day's mood in
/// the same slot.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotCorrelation {
    pub time_of_day: TimeOfDay,
    /// Pearson coefficient rounded to two decimals.
    pub coefficient: f64,
    /// `(level on day n, level on day n+1)` pairs.
    pub pairs: Vec<(u8, u8)>,
}

/// Day-over-day correlation per slot across consecutive tracked days.
///
/// A slot is listed once it appears on any day that has a successor, even if
/// the successor never recorded that slot.
pub fn consecutive_day_correlations(data: &MoodData) -> Vec<SlotCorrelation> {
    let days: Vec<_> = dated_days(data)
        .into_iter()
        .filter(|(_, entries)| !entries.is_empty())
        .collect();
    let mut pairs: BTreeMap<TimeOfDay, Vec<(u8, u8)>> = BTreeMap::new();

    for window in days.windows(2) {
        let (current, next) = (window[0].1, window[1].1);
        for (slot, entry) in current {
            let slot_pairs = pairs.entry(*slot).or_default();
            if let Some(next_entry) = next.get(slot) {
                slot_pairs.push((entry.level.value(), next_entry.level.value()));
            }
        }
    }

    pairs
        .into_iter()
        .map(|(time_of_day, pairs)| {
            let prev: Vec<f64> = pairs.iter().map(|(a, _)| f64::from(*a)).collect();
            let next: Vec<f64> = pairs.iter().map(|(_, b)| f64::from(*b)).collect();
            SlotCorrelation {
                time_of_day,
                coefficient: round2(correlation(&prev, &next)),
                pairs,
            }
        })
        .collect()
}

// ==================== Triggers ====================

/// Average mood of entries where a questionnaire trigger was flagged.
#[derive(Debug, Clone, PartialEq)]
pub struct TriggerImpact {
    pub trigger: String,
    pub average: f64,
    pub count: usize,
}

/// Trigger impacts, lowest average first.
pub fn trigger_impact(data: &MoodData) -> Vec<TriggerImpact> {
    let mut levels: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for (_, entries) in dated_days(data) {
        for entry in entries.values() {
            let Some(questionnaire) = &entry.questionnaire else {
                continue;
            };
            for trigger in questionnaire.active_triggers() {
                levels
                    .entry(trigger)
                    .or_default()
                    .push(entry.level.as_f64());
            }
        }
    }

    let mut impacts: Vec<TriggerImpact> = levels
        .into_iter()
        .map(|(trigger, values)| TriggerImpact {
            trigger: trigger.to_string(),
            average: mean(&values),
            count: values.len(),
        })
        .collect();
    impacts.sort_by(|a, b| a.average.total_cmp(&b.average));
    impacts
}
