use std::sync::{Arc, Mutex};

use chrono::Local;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    error::{Result, SchedulerError},
    schedule::compute_next_run,
    types::{Job, JobStatus, Schedule},
};

type SharedJobs = Arc<Mutex<Vec<Job>>>;

/// Shared handle for job management (add/list/remove) while the engine loop
/// runs. Cheap to clone; HTTP handlers hold one of these.
#[derive(Clone)]
pub struct SchedulerHandle {
    jobs: SharedJobs,
}

impl SchedulerHandle {
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Register a new job. Returns the fully populated [`Job`] record,
    /// including the generated id the caller can later unregister with.
    pub fn add_job(&self, name: &str, schedule: Schedule, action: &str) -> Result<Job> {
        let now = Local::now();
        let next = compute_next_run(&schedule, now);
        if next.is_none() {
            return Err(SchedulerError::InvalidSchedule(
                "schedule has no future firing".to_string(),
            ));
        }

        let job = Job {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            schedule,
            action: action.to_string(),
            status: JobStatus::Pending,
            last_run: None,
            next_run: next,
            run_count: 0,
            created_at: now,
        };

        info!(job_id = %job.id, name = %job.name, "job registered");
        self.jobs.lock().unwrap().push(job.clone());
        Ok(job)
    }

    /// Unregister a job by ID. Returns `JobNotFound` if no entry matches.
    pub fn remove_job(&self, id: &str) -> Result<()> {
        let mut jobs = self.jobs.lock().unwrap();
        let len = jobs.len();
        jobs.retain(|j| j.id != id);
        if jobs.len() == len {
            return Err(SchedulerError::JobNotFound { id: id.to_string() });
        }
        info!(job_id = %id, "job unregistered");
        Ok(())
    }

    /// Return all known jobs in registration order.
    pub fn list_jobs(&self) -> Vec<Job> {
        self.jobs.lock().unwrap().clone()
    }
}

impl Default for SchedulerHandle {
    fn default() -> Self {
        Self::new()
    }
}

/// Core scheduler: drives execution off the shared store at ±1 s precision.
pub struct SchedulerEngine {
    jobs: SharedJobs,
    /// Fired jobs are sent here for delivery routing.
    fired_tx: mpsc::Sender<Job>,
}

impl SchedulerEngine {
    /// Create an engine over the same store as `handle`.
    ///
    /// The sender is used non-blockingly (`try_send`) so the tick loop is
    /// never stalled by a slow delivery router.
    pub fn new(handle: &SchedulerHandle, fired_tx: mpsc::Sender<Job>) -> Self {
        Self {
            jobs: Arc::clone(&handle.jobs),
            fired_tx,
        }
    }

    /// Main event loop. Polls every second until `shutdown` broadcasts `true`.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!("scheduler engine started");

        let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = interval.tick() => {
                    self.tick();
                }
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        info!("scheduler engine shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Fire all jobs whose next_run has arrived. Exposed for tests.
    pub fn tick(&mut self) {
        let now = Local::now();
        let mut fired: Vec<Job> = Vec::new();

        {
            let mut jobs = self.jobs.lock().unwrap();
            for job in jobs.iter_mut() {
                let due = job.status == JobStatus::Pending
                    && job.next_run.is_some_and(|next| next <= now);
                if !due {
                    continue;
                }

                job.last_run = Some(now);
                job.run_count += 1;
                job.next_run = compute_next_run(&job.schedule, now);
                // No future run left: Once jobs complete after their single fire.
                if job.next_run.is_none() {
                    job.status = JobStatus::Completed;
                }

                info!(
                    job_id = %job.id,
                    name = %job.name,
                    run = job.run_count,
                    "job fired"
                );
                fired.push(job.clone());
            }
        }

        // Forward outside the lock; try_send never blocks the tick loop.
        for job in fired {
            if let Err(e) = self.fired_tx.try_send(job.clone()) {
                match e {
                    mpsc::error::TrySendError::Full(_) => {
                        warn!(job_id = %job.id, "delivery channel full, firing dropped");
                    }
                    mpsc::error::TrySendError::Closed(_) => {
                        error!(job_id = %job.id, "delivery channel closed, firing dropped");
                    }
                }
            }
        }
    }
}
