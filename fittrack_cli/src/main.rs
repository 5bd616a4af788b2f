use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use fittrack_core::*;
use std::path::{Path, PathBuf};

const SESSIONS_FILE: &str = "sessions.jsonl";
const GOALS_FILE: &str = "goals.json";

#[derive(Parser)]
#[command(name = "fittrack")]
#[command(about = "Workout statistics for the FitTrack dashboard", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Override data directory (expects sessions.jsonl and goals.json)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Use this config file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// User whose records are summarized
    #[arg(long, global = true)]
    user: Option<String>,

    /// Reference time (RFC 3339); defaults to the current time
    #[arg(long, global = true, value_parser = parse_now)]
    now: Option<DateTime<Utc>>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard summary as JSON
    Dashboard {
        /// Write the summary to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the progress summary as JSON
    Progress {
        /// Write the summary to this file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Export the session history to CSV
    Export {
        /// Destination CSV file
        #[arg(long)]
        csv: PathBuf,
    },

    /// Validate a goal before it is created
    CheckGoal {
        #[arg(long)]
        name: String,

        /// Goal type (weight, consistency, performance or free text)
        #[arg(long = "type")]
        kind: String,

        #[arg(long, allow_negative_numbers = true)]
        target: f64,

        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        current: f64,
    },
}

fn parse_now(s: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("invalid RFC 3339 time '{}': {}", s, e))
}

fn main() -> Result<()> {
    fittrack_core::logging::init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    let data_dir = cli
        .data_dir
        .clone()
        .unwrap_or_else(|| config.data.data_dir.clone());
    let now = cli.now.unwrap_or_else(Utc::now);

    match cli.command {
        Commands::Dashboard { output } => {
            let snapshot = load_user_snapshot(&data_dir, cli.user.as_deref())?;
            let summary = build_dashboard(&snapshot, now, &config);
            emit(&summary, output.as_deref())
        }
        Commands::Progress { output } => {
            let snapshot = load_user_snapshot(&data_dir, cli.user.as_deref())?;
            let summary = build_progress(&snapshot, now, &config);
            emit(&summary, output.as_deref())
        }
        Commands::Export { csv } => {
            let snapshot = load_user_snapshot(&data_dir, cli.user.as_deref())?;
            let count = export_sessions_csv(
                &snapshot.sessions,
                &csv,
                config.estimates.calories_per_minute,
            )?;
            println!("✓ Exported {} sessions", count);
            println!("  CSV: {}", csv.display());
            Ok(())
        }
        Commands::CheckGoal {
            name,
            kind,
            target,
            current,
        } => cmd_check_goal(name, kind, target, current),
    }
}

/// Load the snapshot and scope it to the requesting user
///
/// Without a user there is nothing we are allowed to show.
fn load_user_snapshot(data_dir: &Path, user: Option<&str>) -> Result<Snapshot> {
    let user = user.ok_or_else(|| Error::Other("no user given; pass --user <id>".into()))?;

    let snapshot = Snapshot::load(&data_dir.join(SESSIONS_FILE), &data_dir.join(GOALS_FILE))?
        .for_user(user);
    tracing::info!(
        "Summarizing {} sessions and {} goals for {}",
        snapshot.sessions.len(),
        snapshot.goals.len(),
        user
    );
    Ok(snapshot)
}

fn emit<T: serde::Serialize>(summary: &T, output: Option<&Path>) -> Result<()> {
    match output {
        Some(path) => {
            write_report(summary, path)?;
            println!("✓ Report written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(summary)?),
    }
    Ok(())
}

fn cmd_check_goal(name: String, kind: String, target: f64, current: f64) -> Result<()> {
    let goal = NewGoal {
        name,
        kind: GoalType::from(kind),
        target_value: target,
        current_value: current,
        deadline: None,
    };
    goal.validate()?;

    println!("✓ Goal '{}' is valid", goal.name.trim());
    println!("  Type: {}", goal.kind.as_str());
    println!("  Target: {}", goal.target_value);
    Ok(())
}
