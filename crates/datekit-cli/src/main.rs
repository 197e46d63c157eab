mod settings;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use datekit::{CalendarUnit, TimeConverter};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use settings::Settings;

const TIME_BOUND_PATTERN: &str = "yyyy-MM-dd HH:mm:ss.SSSSSSSSS";

#[derive(Parser)]
#[command(
    name = "datekit",
    about = "Zoned date conversion, period boundaries, differences, and recurrence checks",
    version
)]
struct Cli {
    /// IANA zone to project instants through (overrides configuration)
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Emit JSON instead of plain text
    #[arg(long, global = true)]
    json: bool,

    /// Extra TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Show the zoned date-time of an epoch-millisecond instant
    Convert {
        millis: i64,
        #[arg(long, default_value = datekit::DATE_TIME_PATTERN)]
        pattern: String,
    },
    /// Convert a zoned date-time to epoch milliseconds
    ToMillis {
        datetime: String,
        #[arg(long, default_value = datekit::DATE_TIME_PATTERN)]
        pattern: String,
    },
    /// Start and end of the year, month, week or day containing a date
    Bounds {
        date: String,
        #[arg(long)]
        unit: CalendarUnit,
        /// Print date-time bounds instead of date bounds
        #[arg(long)]
        time: bool,
        #[arg(long, default_value = datekit::DATE_PATTERN)]
        pattern: String,
    },
    /// Whole units between two date-times
    Between {
        start: String,
        end: String,
        #[arg(long)]
        unit: CalendarUnit,
        #[arg(long, default_value = datekit::DATE_TIME_PATTERN)]
        pattern: String,
    },
    /// Whether anchor + n × cycle units falls on today (or --today)
    Recurs {
        anchor: String,
        #[arg(long)]
        unit: CalendarUnit,
        #[arg(long, allow_negative_numbers = true)]
        cycle: i64,
        /// Day to test instead of today in the configured zone
        #[arg(long)]
        today: Option<String>,
        #[arg(long, default_value = datekit::DATE_PATTERN)]
        pattern: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    init_logging(&settings.log_level);

    let converter = match cli.timezone.as_deref().or(settings.timezone.as_deref()) {
        Some(name) => TimeConverter::from_name(name)?,
        None => TimeConverter::system(),
    };
    tracing::debug!(zone = %converter.zone().name(), "converter ready");

    run(cli.command, &converter, cli.json)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Command, converter: &TimeConverter, as_json: bool) -> Result<()> {
    match command {
        Command::Convert { millis, pattern } => {
            let local = converter.format_instant(millis, &pattern)?;
            if as_json {
                let date = converter.to_calendar_date(millis)?;
                print_json(&json!({
                    "instant": millis,
                    "local": local,
                    "date": date,
                    "timezone": converter.zone().name(),
                }))?;
            } else {
                println!("{local}");
            }
        }
        Command::ToMillis { datetime, pattern } => {
            let local = datekit::parse_date_time(&datetime, &pattern)
                .with_context(|| format!("cannot read date-time '{datetime}'"))?;
            let millis = converter.date_time_to_instant(local)?;
            if as_json {
                print_json(&json!({
                    "instant": millis,
                    "timezone": converter.zone().name(),
                }))?;
            } else {
                println!("{millis}");
            }
        }
        Command::Bounds {
            date,
            unit,
            time,
            pattern,
        } => {
            let date = datekit::parse_date(&date, &pattern)
                .with_context(|| format!("cannot read date '{date}'"))?;
            if time {
                let span = datekit::time_bounds_of_unit(date, unit)?;
                if as_json {
                    print_json(&span)?;
                } else {
                    println!("{}", datekit::format_date_time(span.start, TIME_BOUND_PATTERN)?);
                    println!("{}", datekit::format_date_time(span.end, TIME_BOUND_PATTERN)?);
                }
            } else {
                let span = datekit::bounds_of_unit(date, unit)?;
                if as_json {
                    print_json(&span)?;
                } else {
                    println!("{}", datekit::format_date(span.start, &pattern)?);
                    println!("{}", datekit::format_date(span.end, &pattern)?);
                }
            }
        }
        Command::Between {
            start,
            end,
            unit,
            pattern,
        } => {
            let value = datekit::between_str(&start, &end, &pattern, unit)
                .with_context(|| format!("cannot measure {unit}s from '{start}' to '{end}'"))?;
            if as_json {
                print_json(&json!({ "unit": unit, "value": value }))?;
            } else {
                println!("{value}");
            }
        }
        Command::Recurs {
            anchor,
            unit,
            cycle,
            today,
            pattern,
        } => {
            let anchor = datekit::parse_date(&anchor, &pattern)
                .with_context(|| format!("cannot read anchor '{anchor}'"))?;
            let today = match today {
                Some(day) => datekit::parse_date(&day, &pattern)
                    .with_context(|| format!("cannot read day '{day}'"))?,
                None => converter.today(),
            };
            let hit = datekit::is_occurrence_on(anchor, unit, cycle, today)?;
            if as_json {
                print_json(&json!({
                    "anchor": anchor,
                    "unit": unit,
                    "cycle": cycle,
                    "day": today,
                    "occurs": hit,
                }))?;
            } else {
                println!("{hit}");
            }
        }
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
