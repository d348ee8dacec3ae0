use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::SchedulerError;

/// Defines when and how often a job should run. Times are process-local.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Schedule {
    /// Run exactly once at the given instant.
    Once { at: DateTime<Local> },

    /// Run repeatedly with a fixed interval in seconds.
    Interval { every_secs: u64 },

    /// Run every day at the given hour and minute.
    Daily { hour: u8, minute: u8 },
}

impl Schedule {
    /// Build a daily schedule, failing fast on out-of-range wall-clock values.
    pub fn daily(hour: u8, minute: u8) -> crate::error::Result<Self> {
        if hour > 23 || minute > 59 {
            return Err(SchedulerError::InvalidSchedule(format!(
                "time of day out of range: {hour:02}:{minute:02}"
            )));
        }
        Ok(Schedule::Daily { hour, minute })
    }
}

/// Lifecycle state of a job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting for its next_run time.
    Pending,
    /// No future runs remain (Once jobs after their single fire).
    Completed,
}

/// A registered job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    /// UUID v4 string — the cancellation handle returned to the registrant.
    pub id: String,
    /// Human-readable label.
    pub name: String,
    /// When the job fires.
    pub schedule: Schedule,
    /// Opaque JSON payload forwarded to the delivery router on fire.
    pub action: String,
    /// Current lifecycle state.
    pub status: JobStatus,
    /// Most recent firing, if any.
    pub last_run: Option<DateTime<Local>>,
    /// Next planned firing, if any.
    pub next_run: Option<DateTime<Local>>,
    /// Total number of firings so far.
    pub run_count: u32,
    /// Registration time.
    pub created_at: DateTime<Local>,
}
