//! Mood Journal Library
//!
//! This module exposes the journal model, its storage and the mood
//! aggregation engine for the CLI, tests and embedding applications.

pub mod analytics;
pub mod config;
pub mod error;
pub mod model;
pub mod store;
pub mod traits;

// Re-export commonly used types
pub use analytics::{
    // Report
    MoodReport,
    ReportOptions,
    // Statistics
    MoodDistribution,
    MoodStats,
    // Temporal analysis
    MoodPrediction,
    StreakSummary,
    Trend,
    // Goals
    Goal,
    GoalKind,
    GoalProgress,
    // Insights
    Impact,
    Pattern,
    PatternKind,
    Recommendation,
    analyze_patterns,
    correlation,
    distribution,
    goal_progress,
    goal_progress_with_clock,
    overall_average,
    predict,
    recommendations,
    streaks,
    variance,
};
pub use config::AppConfig;
pub use error::{ModelError, StoreError};
pub use model::{DayEntries, MoodData, MoodEntry, MoodLevel, Questionnaire, TimeOfDay};
pub use store::{JsonFileStore, MemoryStore, MoodRepository};
pub use traits::{Clock, MockClock, SystemClock};
