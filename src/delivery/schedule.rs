//! Daily scheduler
//!
//! Runs the batch once per day at a wall-clock time in a fixed UTC offset
//! (09:00 at +05:30 by default) until Ctrl-C.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime, TimeZone, Utc};
use tracing::{error, info};

use crate::config::ScheduleConfig;
use crate::delivery::DailyBatch;
use crate::errors::{ReportError, Result};

/// Next instant strictly after `now` whose local time at `offset_minutes` is `time`
pub fn next_run_after(now: DateTime<Utc>, time: NaiveTime, offset_minutes: i32) -> Result<DateTime<Utc>> {
    let offset = FixedOffset::east_opt(offset_minutes * 60).ok_or_else(|| {
        ReportError::ConfigError(format!("UTC offset out of range: {} minutes", offset_minutes))
    })?;

    let local_now = now.with_timezone(&offset);
    let today = local_now.date_naive().and_time(time);
    let mut next = offset
        .from_local_datetime(&today)
        .single()
        .ok_or_else(|| ReportError::ConfigError(format!("Ambiguous schedule time {}", time)))?;

    if next <= local_now {
        next = next + Duration::days(1);
    }
    Ok(next.with_timezone(&Utc))
}

/// Sleep until each scheduled time and run the batch; returns on Ctrl-C
pub async fn run_scheduler(batch: &DailyBatch, schedule: &ScheduleConfig) -> Result<()> {
    let time = schedule.run_time()?;

    loop {
        let now = Utc::now();
        let next = next_run_after(now, time, schedule.utc_offset_minutes)?;
        let wait = (next - now).to_std().unwrap_or_default();
        info!(next_run = %next, wait_secs = wait.as_secs(), "Scheduler waiting");

        tokio::select! {
            _ = tokio::time::sleep(wait) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl-C, stopping scheduler");
                return Ok(());
            }
        }

        if let Err(e) = batch.run().await {
            error!(error = %e, "Daily batch failed");
        }
    }
}
