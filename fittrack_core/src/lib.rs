#![forbid(unsafe_code)]

//! Workout statistics for the FitTrack dashboard and progress pages.
//!
//! This crate provides:
//! - Domain types (sessions, exercise logs, goals)
//! - Snapshot loading and normalization of raw datastore records
//! - Streaks, time windows, strength progression and goal progress
//! - The dashboard and progress summaries built from them
//! - CSV export and atomic report writing

pub mod types;
pub mod error;
pub mod config;
pub mod logging;
pub mod percent;
pub mod snapshot;
pub mod streak;
pub mod window;
pub mod strength;
pub mod goals;
pub mod dashboard;
pub mod progress;
pub mod export;
pub mod report;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use config::Config;
pub use snapshot::Snapshot;
pub use streak::current_streak;
pub use strength::{strength_progressions, StrengthProgression};
pub use goals::goal_progress;
pub use dashboard::{build_dashboard, DashboardSummary};
pub use progress::{build_progress, ProgressSummary};
pub use export::export_sessions_csv;
pub use report::write_report;
