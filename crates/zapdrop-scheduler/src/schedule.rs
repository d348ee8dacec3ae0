use chrono::{DateTime, Datelike, Duration, Local, TimeZone};

use crate::types::Schedule;

/// Compute the next execution time for `schedule` strictly after `from`.
///
/// Returns `None` when the schedule is exhausted (a `Once` job whose time
/// has already passed). `Daily` schedules are never exhausted.
pub fn compute_next_run(schedule: &Schedule, from: DateTime<Local>) -> Option<DateTime<Local>> {
    match schedule {
        Schedule::Once { at } => {
            // Fire only if the instant is still in the future.
            if *at > from {
                Some(*at)
            } else {
                None
            }
        }

        Schedule::Interval { every_secs } => Some(from + Duration::seconds(*every_secs as i64)),

        Schedule::Daily { hour, minute } => next_daily(&from, *hour, *minute),
    }
}

/// Resolve HH:MM on today's date, or the first following day where the
/// wall-clock time both exists and lies after `from`.
///
/// A DST spring-forward gap can swallow the wall-clock time entirely on
/// the transition day; `earliest()` skips it (and picks the first of two
/// ambiguous fall-back instants) instead of treating the schedule as
/// exhausted. Recomputing from the calendar date also keeps the firing at
/// HH:MM across an offset change, where adding 24 h would drift.
fn next_daily<Tz: TimeZone>(from: &DateTime<Tz>, hour: u8, minute: u8) -> Option<DateTime<Tz>> {
    let tz = from.timezone();
    let mut date = from.date_naive();
    for _ in 0..3 {
        let candidate = tz
            .with_ymd_and_hms(
                date.year(),
                date.month(),
                date.day(),
                hour as u32,
                minute as u32,
                0,
            )
            .earliest();
        if let Some(candidate) = candidate {
            if candidate > *from {
                return Some(candidate);
            }
        }
        date = date.succ_opt()?;
    }
    None
}
