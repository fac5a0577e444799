//! Heuristic patterns and recommendations.
//!
//! Each rule reads the canonical aggregates from [`super::stats`] and
//! [`super::temporal`]; nothing here recomputes a metric of its own.

use chrono::{Duration as ChronoDuration, NaiveDate};

use super::ReportOptions;
use super::accessors::{dated_days, daily_average, flatten_entries, tracked_days};
use super::stats::{is_unstable, mean, overall_average, time_of_day_breakdown, trigger_impact, variance};
use super::temporal::recent_activity;
use crate::model::{MoodData, TimeOfDay};

/// Activities looked for in entry notes.
pub const ACTIVITY_KEYWORDS: [&str; 5] = ["exercise", "work", "sleep", "social", "meditation"];

/// Minimum number of notes mentioning an activity before it is reported.
const MIN_ACTIVITY_SAMPLES: usize = 3;

/// Entries per group when comparing early and late mood.
const TREND_GROUP_SIZE: usize = 7;

/// Daily averages the stability rule looks at.
const STABILITY_SAMPLE_DAYS: usize = 7;

/// Upper bound on the number of recommendations returned.
pub const MAX_RECOMMENDATIONS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

impl Impact {
    pub fn as_str(&self) -> &'static str {
        match self {
            Impact::Positive => "positive",
            Impact::Negative => "negative",
            Impact::Neutral => "neutral",
        }
    }
}

/// The rule a pattern came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    TimeOfDay,
    Activity,
    Trend,
    Stability,
}

impl PatternKind {
    pub fn title(&self) -> &'static str {
        match self {
            PatternKind::TimeOfDay => "Time of Day Pattern",
            PatternKind::Activity => "Activity Correlation",
            PatternKind::Trend => "Mood Trend",
            PatternKind::Stability => "Mood Stability",
        }
    }
}

/// A detected pattern with suggestions.
#[derive(Debug, Clone, PartialEq)]
pub struct Pattern {
    pub kind: PatternKind,
    pub description: String,
    /// Fixed per rule, in percent.
    pub confidence: u8,
    pub impact: Impact,
    pub suggestions: Vec<String>,
}

impl Pattern {
    pub fn title(&self) -> &'static str {
        self.kind.title()
    }
}

fn owned(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|s| s.to_string()).collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// ==================== Pattern Rules ====================

/// Morning vs evening mood, when they differ by more than half a level.
pub fn analyze_time_patterns(data: &MoodData) -> Option<Pattern> {
    let entries = flatten_entries(data);
    let levels_for = |slot: TimeOfDay| -> Vec<f64> {
        entries
            .iter()
            .filter(|e| e.time_of_day == slot)
            .map(|e| e.level.as_f64())
            .collect()
    };

    let morning = levels_for(TimeOfDay::Morning);
    let evening = levels_for(TimeOfDay::Evening);
    if morning.is_empty() || evening.is_empty() {
        return None;
    }

    let (avg_morning, avg_evening) = (mean(&morning), mean(&evening));
    if (avg_morning - avg_evening).abs() <= 0.5 {
        return None;
    }

    let mornings_better = avg_morning > avg_evening;
    Some(Pattern {
        kind: PatternKind::TimeOfDay,
        description: if mornings_better {
            "You tend to feel better in the mornings compared to evenings"
        } else {
            "You tend to feel better in the evenings compared to mornings"
        }
        .to_string(),
        confidence: 85,
        impact: Impact::Neutral,
        suggestions: owned(&[
            if mornings_better {
                "Consider scheduling important tasks in the morning"
            } else {
                "Try to schedule challenging activities for the evening"
            },
            "Maintain a consistent sleep schedule",
            "Plan activities around your natural mood patterns",
        ]),
    })
}

/// One pattern per activity mentioned in at least three notes.
pub fn analyze_activity_patterns(data: &MoodData) -> Vec<Pattern> {
    let notes: Vec<(String, f64)> = flatten_entries(data)
        .into_iter()
        .filter_map(|e| e.note.map(|n| (n.to_lowercase(), e.level.as_f64())))
        .collect();

    ACTIVITY_KEYWORDS
        .iter()
        .filter_map(|&activity| {
            let levels: Vec<f64> = notes
                .iter()
                .filter(|(note, _)| note.contains(activity))
                .map(|(_, level)| *level)
                .collect();
            if levels.len() < MIN_ACTIVITY_SAMPLES {
                return None;
            }

            let avg = mean(&levels);
            let (impact, verb, suggestion) = if avg > 3.5 {
                (
                    Impact::Positive,
                    "boost",
                    format!("Try to incorporate more {activity} into your routine"),
                )
            } else if avg < 2.5 {
                (
                    Impact::Negative,
                    "lower",
                    format!("Consider adjusting your approach to {activity} or seeking support"),
                )
            } else {
                (
                    Impact::Neutral,
                    "maintain",
                    format!("Monitor how {activity} affects your mood in different contexts"),
                )
            };

            Some(Pattern {
                kind: PatternKind::Activity,
                description: format!("{} appears to {} your mood", capitalize(activity), verb),
                confidence: 75,
                impact,
                suggestions: vec![suggestion],
            })
        })
        .collect()
}

/// Compare the first and last groups of entries once a week of days exists.
pub fn analyze_trends(data: &MoodData) -> Option<Pattern> {
    let days = dated_days(data);
    if tracked_days(data).len() < TREND_GROUP_SIZE {
        return None;
    }

    let mut group_averages = Vec::new();
    let mut group: Vec<f64> = Vec::new();
    for (_, entries) in days {
        group.extend(entries.values().map(|e| e.level.as_f64()));
        if group.len() >= TREND_GROUP_SIZE {
            group_averages.push(mean(&group));
            group.clear();
        }
    }

    let (first, last) = match group_averages.as_slice() {
        [first, .., last] => (*first, *last),
        _ => return None,
    };
    let difference = last - first;
    if difference.abs() <= 0.3 {
        return None;
    }

    let improving = difference > 0.0;
    Some(Pattern {
        kind: PatternKind::Trend,
        description: if improving {
            "Your overall mood has been improving over time"
        } else {
            "Your mood has been declining recently"
        }
        .to_string(),
        confidence: 80,
        impact: if improving {
            Impact::Positive
        } else {
            Impact::Negative
        },
        suggestions: if improving {
            owned(&[
                "Keep up your current positive practices",
                "Document what's working well for you",
                "Share your success strategies with others",
            ])
        } else {
            owned(&[
                "Consider talking to a mental health professional",
                "Review and adjust your self-care routine",
                "Identify and address potential stressors",
            ])
        },
    })
}

/// Daily averages of the most recent tracked days in the lookback window.
///
/// `None` unless more than a week of days was tracked in the window.
pub fn recent_daily_averages(
    data: &MoodData,
    today: NaiveDate,
    lookback_days: usize,
) -> Option<Vec<f64>> {
    let averages: Vec<f64> = (0..lookback_days)
        .filter_map(|i| today.checked_sub_signed(ChronoDuration::days(i as i64)))
        .filter_map(|date| data.day(date).and_then(daily_average))
        .collect();

    (averages.len() > STABILITY_SAMPLE_DAYS)
        .then(|| averages.into_iter().take(STABILITY_SAMPLE_DAYS).collect())
}

/// Flags a volatile last week.
pub fn analyze_stability(data: &MoodData, today: NaiveDate, lookback_days: usize) -> Option<Pattern> {
    let recent = recent_daily_averages(data, today, lookback_days)?;
    if !is_unstable(&recent) {
        return None;
    }

    tracing::debug!("Recent mood variance {:.2}", variance(&recent));
    Some(Pattern {
        kind: PatternKind::Stability,
        description: "Your mood has been quite variable lately".to_string(),
        confidence: 70,
        impact: Impact::Negative,
        suggestions: owned(&[
            "Try establishing a consistent daily routine",
            "Practice a short mindfulness exercise each day",
            "Note what happens on your lowest days",
        ]),
    })
}

/// Every pattern rule, in a fixed order.
pub fn analyze_patterns(data: &MoodData, today: NaiveDate, options: &ReportOptions) -> Vec<Pattern> {
    let mut patterns = Vec::new();
    patterns.extend(analyze_time_patterns(data));
    patterns.extend(analyze_activity_patterns(data));
    patterns.extend(analyze_trends(data));
    patterns.extend(analyze_stability(data, today, options.instability_lookback_days));
    patterns
}

// ==================== Recommendations ====================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub title: String,
    pub description: String,
}

impl Recommendation {
    fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }
}

/// Up to [`MAX_RECOMMENDATIONS`] suggestions, in rule order.
pub fn recommendations(
    data: &MoodData,
    today: NaiveDate,
    options: &ReportOptions,
) -> Vec<Recommendation> {
    let mut out = Vec::new();
    let overall = overall_average(data, None);
    let total_entries = flatten_entries(data).len();

    let recently_tracked = recent_activity(data, today, options.recent_activity_days)
        .iter()
        .filter(|day| day.has_entry)
        .count();
    if recently_tracked < 3 {
        out.push(Recommendation::new(
            "Build Your Streak",
            "Try to log your mood daily to maintain consistency and get better insights.",
        ));
    }

    for impact in trigger_impact(data)
        .into_iter()
        .take(2)
        .filter(|t| t.average < overall - 0.5)
    {
        out.push(Recommendation::new(
            format!("Manage {}", impact.trigger),
            format!(
                "This trigger tends to lower your mood. Consider developing strategies to better handle {}.",
                impact.trigger.to_lowercase()
            ),
        ));
    }

    if recent_daily_averages(data, today, options.instability_lookback_days)
        .is_some_and(|recent| is_unstable(&recent))
    {
        out.push(Recommendation::new(
            "Improve Mood Stability",
            "Try establishing a consistent daily routine to help stabilize your mood patterns.",
        ));
    }

    let slots: Vec<_> = time_of_day_breakdown(data)
        .into_iter()
        .filter(|slot| slot.entry_count > 0)
        .collect();
    let worst_slot = slots
        .iter()
        .min_by(|a, b| a.average.total_cmp(&b.average))
        .filter(|_| slots.len() >= 2);
    if let Some(worst) = worst_slot {
        out.push(Recommendation::new(
            "Schedule Adjustment",
            format!(
                "Consider planning uplifting activities during the {} to improve your mood during challenging times.",
                worst.time_of_day
            ),
        ));
    }

    let reflective_days = dated_days(data)
        .iter()
        .filter(|(_, entries)| entries.values().any(|e| e.note_text().is_some()))
        .count();
    if (reflective_days as f64) < total_entries as f64 * 0.5 {
        out.push(Recommendation::new(
            "Enhance Reflection",
            "Adding notes to your mood entries can help identify patterns and triggers.",
        ));
    }

    if total_entries > 0 && overall < 3.0 {
        out.push(Recommendation::new(
            "Mental Health Check",
            "Your mood has been lower than usual. Consider speaking with a mental health professional.",
        ));
    }

    if overall > 4.0 {
        out.push(Recommendation::new(
            "Keep Up the Good Work",
            "You're maintaining a positive mood! Continue your current practices and activities.",
        ));
    }

    out.truncate(MAX_RECOMMENDATIONS);
    out
}
