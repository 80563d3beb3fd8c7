use anyhow::{anyhow, Result};
use std::sync::Arc;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::info;

use crate::runner::Watcher;

/// Registers the watcher on `schedule` (six fields with seconds, UTC) and starts the scheduler.
/// Overlapping runs are not prevented.
pub async fn start(watcher: Arc<Watcher>, schedule: &str) -> Result<JobScheduler> {
    let job = check_job(watcher, schedule)?;

    let scheduler = JobScheduler::new()
        .await
        .map_err(|e| anyhow!("Failed to create scheduler: {}", e))?;

    scheduler
        .add(job)
        .await
        .map_err(|e| anyhow!("Failed to register check job: {}", e))?;
    scheduler
        .start()
        .await
        .map_err(|e| anyhow!("Failed to start scheduler: {}", e))?;

    info!("Scheduled site checks with cron expression {}", schedule);
    Ok(scheduler)
}

fn check_job(watcher: Arc<Watcher>, schedule: &str) -> Result<Job> {
    Job::new_async(schedule, move |_uuid, _lock| {
        let watcher = Arc::clone(&watcher);
        Box::pin(async move {
            watcher.run().await;
        })
    })
    .map_err(|e| anyhow!("Invalid schedule {:?}: {}", schedule, e))
}
