//! `zapdrop-scheduler` — Tokio-based in-memory job scheduler.
//!
//! # Overview
//!
//! Jobs live in a shared in-process store. The [`engine::SchedulerEngine`]
//! polls the store every second and fires any job whose `next_run` has
//! arrived, updating state and computing the next scheduled time. Fired jobs
//! are forwarded over an mpsc channel to whoever routes deliveries.
//!
//! Nothing is persisted: a process restart forgets every schedule.
//!
//! # Schedule variants
//!
//! | Variant    | Behaviour                                |
//! |------------|------------------------------------------|
//! | `Once`     | Single fire at an absolute local instant |
//! | `Interval` | Repeat every N seconds                   |
//! | `Daily`    | Fire at HH:MM local time every day       |

pub mod engine;
pub mod error;
pub mod schedule;
pub mod types;

pub use engine::{SchedulerEngine, SchedulerHandle};
pub use error::{Result, SchedulerError};
pub use types::{Job, JobStatus, Schedule};
