//! `focus-engine` CLI - run the task auto-scheduler from the command line.
//!
//! All subcommands read JSON (stdin or `-i FILE`) and write pretty-printed JSON
//! (stdout or `-o FILE`). Logs go to stderr.
//!
//! ## Usage
//!
//! ```sh
//! # Schedule tasks around existing blocks
//! focus-engine schedule -i day.json --config focus.toml
//!
//! # Free slots for one day
//! focus-engine slots --date 2026-03-16 -i blocks.json
//!
//! # Check a proposed span against the calendar
//! focus-engine conflicts --start 2026-03-16T11:00:00Z --end 2026-03-16T12:00:00Z -i blocks.json
//!
//! # Re-run after blocks were removed
//! focus-engine reschedule --removed blk-1,blk-2 -i changed.json
//!
//! # Estimate duration, priority and context for a new task
//! focus-engine triage --name "Investor update email" --due 2026-03-20
//! ```

mod config;

use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use focus_engine::{
    auto_schedule_at, calculate_do_date, detect_context, estimate_duration, find_conflicts,
    find_available_slots_with_floor, infer_priority_level, reschedule_on_calendar_change_at,
    FocusBlock, PriorityLevel, ScheduleRequest, SchedulerPreferences, Task,
};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(
    name = "focus-engine",
    version,
    about = "Task auto-scheduler for time-blocked calendars"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Preferences TOML file; FOCUS_ENGINE_* environment variables override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log engine decisions to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Place tasks into free slots: {tasks, existing_blocks, target_date?}
    Schedule {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Current instant as RFC 3339 (system clock if omitted)
        #[arg(long)]
        now: Option<String>,
    },
    /// List free slots for one day from a JSON array of blocks
    Slots {
        /// Day to inspect, YYYY-MM-DD
        #[arg(long)]
        date: String,
        #[arg(short, long)]
        input: Option<String>,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Check a proposed span against a JSON array of blocks
    Conflicts {
        /// Proposed start, RFC 3339
        #[arg(long)]
        start: String,
        /// Proposed end, RFC 3339
        #[arg(long)]
        end: String,
        #[arg(short, long)]
        input: Option<String>,
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Re-run scheduling after a calendar change: {tasks, new_blocks}
    Reschedule {
        /// Comma-separated ids of blocks that were removed
        #[arg(long)]
        removed: Option<String>,
        #[arg(short, long)]
        input: Option<String>,
        #[arg(short, long)]
        output: Option<String>,
        #[arg(long)]
        now: Option<String>,
    },
    /// Estimate duration, priority, context and do-date for a task
    Triage {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Due date, YYYY-MM-DD
        #[arg(long)]
        due: Option<String>,
        /// Context to use instead of detecting one
        #[arg(long)]
        context: Option<String>,
        /// Today's date, YYYY-MM-DD (system clock if omitted)
        #[arg(long)]
        today: Option<String>,
        /// Minimum days of lead time before the due date
        #[arg(long, default_value_t = 1)]
        buffer_days: u32,
        #[arg(short, long)]
        output: Option<String>,
    },
}

#[derive(Deserialize)]
struct ScheduleInput {
    tasks: Vec<Task>,
    #[serde(default)]
    existing_blocks: Vec<FocusBlock>,
    #[serde(default)]
    target_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct RescheduleInput {
    tasks: Vec<Task>,
    #[serde(default)]
    new_blocks: Vec<FocusBlock>,
}

#[derive(Serialize)]
struct TriageOutput {
    duration_minutes: u32,
    priority_level: PriorityLevel,
    context: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    do_date: Option<NaiveDate>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let preferences = config::load_preferences(cli.config.as_deref())
        .context("Failed to load scheduler preferences")?;

    match cli.command {
        Commands::Schedule { input, output, now } => {
            let raw = read_input(input.as_deref())?;
            let parsed: ScheduleInput =
                serde_json::from_str(&raw).context("Failed to parse schedule input JSON")?;
            let request = ScheduleRequest {
                tasks: parsed.tasks,
                existing_blocks: parsed.existing_blocks,
                preferences,
                target_date: parsed.target_date,
            };
            let result = auto_schedule_at(&request, parse_now(now.as_deref())?)
                .context("Failed to schedule tasks")?;
            write_json(output.as_deref(), &result)?;
        }
        Commands::Slots {
            date,
            input,
            output,
        } => {
            let date = parse_date(&date)?;
            let blocks = read_blocks(input.as_deref())?;
            let tz = preferences.tz()?;
            let slots = find_available_slots_with_floor(
                date,
                &blocks,
                &preferences.working_hours,
                preferences.buffer_minutes(),
                &tz,
                preferences.tuning.min_slot_minutes,
            );
            write_json(output.as_deref(), &slots)?;
        }
        Commands::Conflicts {
            start,
            end,
            input,
            output,
        } => {
            let start = parse_instant(&start)?;
            let end = parse_instant(&end)?;
            if end <= start {
                anyhow::bail!("--end must be after --start");
            }
            let blocks = read_blocks(input.as_deref())?;
            write_json(output.as_deref(), &find_conflicts(start, end, &blocks))?;
        }
        Commands::Reschedule {
            removed,
            input,
            output,
            now,
        } => {
            let raw = read_input(input.as_deref())?;
            let parsed: RescheduleInput =
                serde_json::from_str(&raw).context("Failed to parse reschedule input JSON")?;
            let removed_ids = split_ids(removed.as_deref());
            let result = reschedule_on_calendar_change_at(
                &parsed.tasks,
                &parsed.new_blocks,
                &removed_ids,
                &preferences,
                parse_now(now.as_deref())?,
            )
            .context("Failed to reschedule tasks")?;
            write_json(output.as_deref(), &result)?;
        }
        Commands::Triage {
            name,
            description,
            due,
            context,
            today,
            buffer_days,
            output,
        } => {
            let today = match today {
                Some(raw) => parse_date(&raw)?,
                None => local_today(&preferences)?,
            };
            let due = due.as_deref().map(parse_date).transpose()?;
            let duration_minutes = estimate_duration(&name, description.as_deref());
            let context =
                context.unwrap_or_else(|| detect_context(&name, description.as_deref()).to_string());
            let triage = TriageOutput {
                duration_minutes,
                priority_level: infer_priority_level(&name, Some(context.as_str()), due, today),
                do_date: due.map(|d| calculate_do_date(d, duration_minutes, buffer_days, today)),
                context,
            };
            write_json(output.as_deref(), &triage)?;
        }
    }

    Ok(())
}

/// Install the stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let default = if verbose { "focus_engine=debug,warn" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .init();
}

fn parse_now(raw: Option<&str>) -> Result<DateTime<Utc>> {
    match raw {
        Some(raw) => parse_instant(raw),
        None => Ok(Utc::now()),
    }
}

fn parse_instant(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("Invalid RFC 3339 timestamp: {}", raw))
}

fn parse_date(raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {}", raw))
}

fn local_today(preferences: &SchedulerPreferences) -> Result<NaiveDate> {
    let tz = preferences.tz()?;
    Ok(Utc::now().with_timezone(&tz).date_naive())
}

/// `--removed a,b` → `["a", "b"]`; blanks are ignored.
fn split_ids(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

fn read_blocks(path: Option<&str>) -> Result<Vec<FocusBlock>> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse blocks JSON (expected an array)")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_json<T: Serialize>(path: Option<&str>, value: &T) -> Result<()> {
    let mut content = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    content.push('\n');
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
