use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use mood_journal::{
    AppConfig, Clock, Goal, GoalKind, JsonFileStore, MoodLevel, MoodReport, MoodRepository,
    ReportOptions, SystemClock, TimeOfDay, goal_progress_with_clock,
};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(name = "mood-journal")]
#[command(about = "Mood journal - record daily moods and review aggregated insights")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record (or overwrite) a mood entry
    Log {
        /// Mood level from 1 (very bad) to 5 (excellent)
        #[arg(long)]
        level: MoodLevel,
        /// morning, afternoon, evening, night or full-day
        #[arg(long = "time", default_value = "full-day")]
        time_of_day: TimeOfDay,
        /// Day of the entry (yyyy-mm-dd), defaults to today
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        note: Option<String>,
    },
    /// Remove every entry of a day
    Reset {
        #[arg(long)]
        date: NaiveDate,
    },
    /// Print statistics, streaks, prediction and insights
    Report {
        /// Override the prediction window (days)
        #[arg(long)]
        window: Option<usize>,
    },
    /// Show progress toward a goal
    Goal {
        #[arg(long)]
        kind: GoalKind,
        #[arg(long)]
        target: f64,
        #[arg(long, default_value = "")]
        description: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let filter = EnvFilter::builder()
        .with_default_directive(tracing::level_filters::LevelFilter::INFO.into())
        .parse_lossy("mood_journal=debug");

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;
    let store = JsonFileStore::new(&config.storage.data_file);
    let clock = SystemClock;

    match args.command {
        Command::Log {
            level,
            time_of_day,
            date,
            note,
        } => {
            let date = date.unwrap_or_else(|| clock.today());
            let previous = store
                .update(|data| data.save_mood(date, time_of_day, level, note))
                .context("Failed to save mood entry")?;

            match previous {
                Some(old) => tracing::info!(
                    "Replaced {} entry for {} ({} -> {})",
                    time_of_day,
                    date,
                    old.level,
                    level
                ),
                None => tracing::info!("Recorded {} mood for {}: {}", time_of_day, date, level),
            }
        }
        Command::Reset { date } => {
            let removed = store
                .update(|data| data.reset_day(date))
                .context("Failed to reset day")?;

            if removed {
                tracing::info!("Removed all entries for {}", date);
            } else {
                tracing::info!("No entries recorded for {}", date);
            }
        }
        Command::Report { window } => {
            let data = store.load().context("Failed to load mood data")?;
            let mut options = ReportOptions::from(&config.analytics);
            if let Some(window) = window {
                options.prediction_window = window;
            }

            let report = MoodReport::build(&data, &options, &clock);
            print_report(&report);
        }
        Command::Goal {
            kind,
            target,
            description,
        } => {
            let data = store.load().context("Failed to load mood data")?;
            let goal = Goal::new(kind, target, description);
            let progress = goal_progress_with_clock(&goal, &data, &clock);

            println!(
                "{} goal (target {}): {:.0}%{}",
                goal.kind,
                goal.target,
                progress.progress,
                if progress.achieved { " - achieved" } else { "" }
            );
        }
    }

    Ok(())
}

fn print_report(report: &MoodReport) {
    if report.is_empty() {
        println!("No mood entries recorded yet.");
        return;
    }

    println!("=== Mood report ({}) ===", report.today);
    println!(
        "Entries: {} over {} days, overall average {:.2}",
        report.entry_count, report.tracked_day_count, report.overall_average
    );
    if let Some(stats) = &report.daily_stats {
        println!(
            "Daily averages: median {:.2}, std dev {:.2}, range {:.2}-{:.2}",
            stats.median, stats.std_dev, stats.min, stats.max
        );
    }

    println!("\nDistribution:");
    let percentages = report.distribution.percentages();
    for (i, count) in report.distribution.counts().iter().enumerate() {
        println!("  {}: {:>4} ({:.1}%)", i + 1, count, percentages[i]);
    }

    println!("\nBy weekday:");
    for day in report.by_weekday.iter().filter(|d| d.entry_count > 0) {
        println!("  {:<9} {:.2} ({} entries)", day.day_name, day.average, day.entry_count);
    }

    println!("\nBy time of day:");
    for slot in report.by_time_of_day.iter().filter(|s| s.entry_count > 0) {
        println!(
            "  {:<20} {:.2} ({} entries)",
            slot.time_of_day.label(),
            slot.average,
            slot.entry_count
        );
    }

    println!("\nStreaks:");
    println!(
        "  active {} | current {} | longest {} | positive {} (best {}) | perfect days {}",
        report.active_streak,
        report.streaks.current,
        report.streaks.longest,
        report.streaks.current_positive,
        report.streaks.longest_positive,
        report.perfect_days
    );

    if let Some(prediction) = &report.prediction {
        print!(
            "\nPrediction ({}-day window): {:.2}, {}",
            prediction.window,
            prediction.forecast,
            prediction.trend.as_str()
        );
        match prediction.accuracy {
            Some(accuracy) => println!(" (accuracy {:.0}%)", accuracy),
            None => println!(),
        }
    }

    if !report.patterns.is_empty() {
        println!("\nPatterns:");
        for pattern in &report.patterns {
            println!(
                "  [{}] {} - {} ({}% confidence)",
                pattern.impact.as_str(),
                pattern.title(),
                pattern.description,
                pattern.confidence
            );
            for suggestion in &pattern.suggestions {
                println!("      * {}", suggestion);
            }
        }
    }

    if !report.recommendations.is_empty() {
        println!("\nRecommendations:");
        for rec in &report.recommendations {
            println!("  {}: {}", rec.title, rec.description);
        }
    }

    let earned: Vec<_> = report
        .badges
        .iter()
        .filter(|b| b.earned())
        .map(|b| b.title)
        .collect();
    if !earned.is_empty() {
        println!("\nBadges: {}", earned.join(", "));
    }

    println!("\nMilestones:");
    for milestone in &report.milestones {
        println!(
            "  {:<20} {}/{} ({:.0}%)",
            milestone.title,
            milestone.current,
            milestone.target,
            milestone.progress_percent()
        );
    }
}
