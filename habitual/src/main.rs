//! habitual - track recurring habits and their streaks
//!
//! Uses XDG Base Directory specification for file locations:
//! - Database: $XDG_DATA_HOME/habitual/habits.db (~/.local/share/habitual/habits.db)
//! - Logs: $XDG_STATE_HOME/habitual/habitual.log (~/.local/state/habitual/habitual.log)
//! - Config: $XDG_CONFIG_HOME/habitual/config.toml (~/.config/habitual/config.toml)

use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDateTime};
use clap::{Parser, Subcommand, ValueEnum};
use habitual_core::analytics::HabitAnalytics;
use habitual_core::format::{format_cadence, format_periods};
use habitual_core::{parse_timestamp, Config, Database, NewHabit, PeriodType};
use serde_json::json;

#[derive(Parser)]
#[command(name = "habitual")]
#[command(about = "Track recurring habits and their streaks")]
#[command(version)]
struct Args {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text", global = true)]
    format: OutputFormat,

    /// Database file (default: from config, else the XDG data directory)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new habit
    Add {
        /// Unique habit name
        name: String,

        /// Cadence unit: daily, weekly or monthly
        #[arg(short, long, value_parser = parse_period_type)]
        period: PeriodType,

        /// Completions needed per period
        #[arg(short, long, default_value = "1", allow_negative_numbers = true)]
        count: i64,

        /// Free-form description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// Record a completion of a habit
    Done {
        name: String,

        /// Completion time as "YYYY-MM-DD HH:MM:SS" (default: now)
        #[arg(long, value_parser = parse_at)]
        at: Option<NaiveDateTime>,
    },

    /// Delete a habit and all of its completions
    Delete { name: String },

    /// List all habits
    List,

    /// Count all completions of a habit
    Count { name: String },

    /// Group habits by period type
    Group,

    /// Show the current (or longest) streak of a habit
    Streak {
        name: String,

        /// Show the longest streak in the habit's history instead
        #[arg(short, long)]
        longest: bool,
    },

    /// Show completions and both streaks of a habit
    Show { name: String },

    /// Show the habit with the longest streak overall
    Best,
}

fn parse_period_type(s: &str) -> std::result::Result<PeriodType, String> {
    s.parse().map_err(|e: habitual_core::Error| e.to_string())
}

fn parse_at(s: &str) -> std::result::Result<NaiveDateTime, String> {
    parse_timestamp(s).map_err(|_| format!("'{s}' is not a valid timestamp, use YYYY-MM-DD HH:MM:SS"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config = Config::load().context("failed to load configuration")?;

    let _log_guard =
        habitual_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let db_path = args.db.clone().unwrap_or_else(|| config.database_path());
    tracing::info!(path = %db_path.display(), "Opening database");

    let db = Database::open(&db_path).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    let now = Local::now().naive_local();
    let format = args.format;

    match args.command {
        Command::Add {
            name,
            period,
            count,
            description,
        } => cmd_add(&db, format, NewHabit::new(name, period, count).with_description(description)),
        Command::Done { name, at } => cmd_done(&db, format, &name, &at.unwrap_or(now)),
        Command::Delete { name } => cmd_delete(&db, format, &name),
        Command::List => cmd_list(&db, format),
        Command::Count { name } => cmd_count(&db, format, &name),
        Command::Group => cmd_group(&db, format),
        Command::Streak { name, longest } => cmd_streak(&db, format, &name, longest, &now),
        Command::Show { name } => cmd_show(&db, format, &name, &now),
        Command::Best => cmd_best(&db, format),
    }
}

fn print_json(value: serde_json::Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn cmd_add(db: &Database, format: OutputFormat, habit: NewHabit) -> Result<()> {
    let habit = db
        .create_habit(&habit)
        .with_context(|| format!("could not create habit '{}'", habit.name))?;

    match format {
        OutputFormat::Json => print_json(serde_json::to_value(&habit)?),
        OutputFormat::Text => {
            println!(
                "Habit '{}' created: {}.",
                habit.name,
                format_cadence(habit.period_type, habit.required_count)
            );
            Ok(())
        }
    }
}

fn cmd_done(db: &Database, format: OutputFormat, name: &str, at: &NaiveDateTime) -> Result<()> {
    db.record_event(name, at)
        .with_context(|| format!("could not record completion for '{}'", name))?;

    let at = habitual_core::format_timestamp(at);
    match format {
        OutputFormat::Json => print_json(json!({ "habit": name, "completed_at": at })),
        OutputFormat::Text => {
            println!("Completed '{}' on {}.", name, at);
            Ok(())
        }
    }
}

fn cmd_delete(db: &Database, format: OutputFormat, name: &str) -> Result<()> {
    db.delete_habit(name)
        .with_context(|| format!("could not delete habit '{}'", name))?;

    match format {
        OutputFormat::Json => print_json(json!({ "deleted": name })),
        OutputFormat::Text => {
            println!("Deleted habit '{}'.", name);
            Ok(())
        }
    }
}

fn cmd_list(db: &Database, format: OutputFormat) -> Result<()> {
    let habits = db.list_habits()?;

    if format == OutputFormat::Json {
        return print_json(serde_json::to_value(&habits)?);
    }

    if habits.is_empty() {
        println!("No habits tracked yet. Create one with 'habitual add'.");
        return Ok(());
    }

    println!("Currently tracked habits:");
    for habit in &habits {
        let cadence = format_cadence(habit.period_type, habit.required_count);
        if habit.description.is_empty() {
            println!("  • {} ({})", habit.name, cadence);
        } else {
            println!("  • {} ({}) - {}", habit.name, cadence, habit.description);
        }
    }
    Ok(())
}

fn cmd_count(db: &Database, format: OutputFormat, name: &str) -> Result<()> {
    let count = HabitAnalytics::new(db).event_count(name)?;

    match format {
        OutputFormat::Json => print_json(json!({ "habit": name, "event_count": count })),
        OutputFormat::Text => {
            let times = if count == 1 { "time" } else { "times" };
            println!("'{}' has been completed {} {}.", name, count, times);
            Ok(())
        }
    }
}

fn cmd_group(db: &Database, format: OutputFormat) -> Result<()> {
    let groups = HabitAnalytics::new(db).group_by_period_type()?;

    if format == OutputFormat::Json {
        let map: serde_json::Map<String, serde_json::Value> = groups
            .iter()
            .map(|(period_type, names)| (period_type.as_str().to_string(), json!(names)))
            .collect();
        return print_json(serde_json::Value::Object(map));
    }

    if groups.is_empty() {
        println!("No habits tracked yet.");
        return Ok(());
    }

    println!("Habits grouped by periodicity:");
    for (period_type, names) in &groups {
        let label = period_type.as_str();
        println!("  {}{}:", label[..1].to_uppercase(), &label[1..]);
        for name in names {
            println!("    • {}", name);
        }
    }
    Ok(())
}

fn cmd_streak(
    db: &Database,
    format: OutputFormat,
    name: &str,
    longest: bool,
    now: &NaiveDateTime,
) -> Result<()> {
    let analytics = HabitAnalytics::new(db);

    if longest {
        let analysis = analytics.streak_analysis(name)?;
        let length = u64::from(analysis.length);
        return match format {
            OutputFormat::Json => print_json(json!({
                "habit": name,
                "kind": "longest",
                "length": length,
                "unit": analysis.period_type.unit(),
                "start": analysis.run.map(|r| r.start.to_string()),
                "end": analysis.run.map(|r| r.end.to_string()),
            })),
            OutputFormat::Text => {
                let periods = format_periods(analysis.period_type, length);
                match analysis.run {
                    Some(run) => println!(
                        "Longest streak for '{}': {} ({} to {}).",
                        name, periods, run.start, run.end
                    ),
                    None => println!("Longest streak for '{}': {}.", name, periods),
                }
                Ok(())
            }
        };
    }

    let report = analytics.habit_report(name, now)?;
    let length = u64::from(report.current_streak);
    let period_type = report.habit.period_type;
    match format {
        OutputFormat::Json => print_json(json!({
            "habit": name,
            "kind": "current",
            "length": length,
            "unit": period_type.unit(),
        })),
        OutputFormat::Text => {
            println!(
                "Current streak for '{}': {}.",
                name,
                format_periods(period_type, length)
            );
            Ok(())
        }
    }
}

fn cmd_show(db: &Database, format: OutputFormat, name: &str, now: &NaiveDateTime) -> Result<()> {
    let report = HabitAnalytics::new(db).habit_report(name, now)?;
    let period_type = report.habit.period_type;

    match format {
        OutputFormat::Json => print_json(json!({
            "habit": report.habit,
            "event_count": report.event_count,
            "current_streak": report.current_streak,
            "longest_streak": report.longest_streak,
        })),
        OutputFormat::Text => {
            println!("{}", report.habit.name);
            if !report.habit.description.is_empty() {
                println!("  {}", report.habit.description);
            }
            println!(
                "  Cadence:        {}",
                format_cadence(period_type, report.habit.required_count)
            );
            println!("  Completions:    {}", report.event_count);
            println!(
                "  Current streak: {}",
                format_periods(period_type, report.current_streak.into())
            );
            println!(
                "  Longest streak: {}",
                format_periods(period_type, report.longest_streak.into())
            );
            Ok(())
        }
    }
}

fn cmd_best(db: &Database, format: OutputFormat) -> Result<()> {
    let best = HabitAnalytics::new(db).longest_streak_overall()?;

    match (format, best) {
        (OutputFormat::Json, Some(best)) => print_json(json!({
            "habit": best.habit,
            "length": best.length,
            "unit": best.period_type.unit(),
        })),
        (OutputFormat::Json, None) => print_json(serde_json::Value::Null),
        (OutputFormat::Text, Some(best)) => {
            println!(
                "Longest streak overall: '{}' with {}.",
                best.habit,
                format_periods(best.period_type, best.length.into())
            );
            Ok(())
        }
        (OutputFormat::Text, None) => {
            println!("No streaks yet.");
            Ok(())
        }
    }
}
