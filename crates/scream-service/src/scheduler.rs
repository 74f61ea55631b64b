//! Digest scheduler
//!
//! Fires the daily top post at 00:05 UTC and the weekly stress report on
//! Mondays at 00:15 UTC. The next fire time is computed from the previous
//! one, not from the wall clock, so a slow job never hides a later job that
//! came due while it ran. A job that starts more than [`MISFIRE_GRACE_MINUTES`]
//! late is skipped.

use chrono::{DateTime, Days, Duration, NaiveDate, NaiveTime, Utc};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use scream_core::WeekWindow;

use crate::services::{DigestService, ServiceContext, ServiceResult};

/// How late a job may start and still run
pub const MISFIRE_GRACE_MINUTES: i64 = 60;

/// Whether a job due at `at` should still run at `now`
pub fn within_grace(at: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    now - at <= Duration::minutes(MISFIRE_GRACE_MINUTES)
}

/// Periodic digest jobs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestJob {
    /// Yesterday's top scream
    DailyTop,
    /// Last Monday-to-Sunday histogram
    WeeklyReport,
}

impl DigestJob {
    /// Minutes past midnight UTC
    const fn fire_minute(self) -> i64 {
        match self {
            Self::DailyTop => 5,
            Self::WeeklyReport => 15,
        }
    }

    const fn name(self) -> &'static str {
        match self {
            Self::DailyTop => "daily_top",
            Self::WeeklyReport => "weekly_report",
        }
    }

    fn fire_time(self, day: NaiveDate) -> DateTime<Utc> {
        day.and_time(NaiveTime::MIN).and_utc() + Duration::minutes(self.fire_minute())
    }

    /// First fire time strictly after `now`
    pub fn next_after(self, now: DateTime<Utc>) -> DateTime<Utc> {
        let today = now.date_naive();
        match self {
            Self::DailyTop => {
                let candidate = self.fire_time(today);
                if candidate > now {
                    candidate
                } else {
                    self.fire_time(today + Days::new(1))
                }
            }
            Self::WeeklyReport => {
                let monday = WeekWindow::containing(today).start();
                let candidate = self.fire_time(monday);
                if candidate > now {
                    candidate
                } else {
                    self.fire_time(monday + Days::new(7))
                }
            }
        }
    }

    /// The earliest job due after `now`
    pub fn next_due(now: DateTime<Utc>) -> (DigestJob, DateTime<Utc>) {
        let daily = Self::DailyTop.next_after(now);
        let weekly = Self::WeeklyReport.next_after(now);
        if weekly < daily {
            (Self::WeeklyReport, weekly)
        } else {
            (Self::DailyTop, daily)
        }
    }
}

/// Drives [`DigestJob`]s on tokio timers
#[derive(Debug, Clone)]
pub struct DigestScheduler {
    ctx: ServiceContext,
}

impl DigestScheduler {
    pub fn new(ctx: ServiceContext) -> Self {
        Self { ctx }
    }

    /// Start the loop on the runtime. Abort the handle to stop it.
    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        let mut cursor = Utc::now();
        info!("Digest scheduler started");

        loop {
            let (job, at) = DigestJob::next_due(cursor);
            let wait = (at - Utc::now()).to_std().unwrap_or_default();
            info!(job = job.name(), %at, "Next digest scheduled");
            tokio::time::sleep(wait).await;

            let now = Utc::now();
            if within_grace(at, now) {
                if let Err(err) = self.run_job(job, at).await {
                    error!(job = job.name(), error = %err, "Digest job failed");
                }
            } else {
                warn!(
                    job = job.name(),
                    %at,
                    late_minutes = (now - at).num_minutes(),
                    "Digest job missed its window, skipping"
                );
            }

            cursor = at;
        }
    }

    /// Run one job as if fired at `at`
    pub async fn run_job(&self, job: DigestJob, at: DateTime<Utc>) -> ServiceResult<()> {
        let digest = DigestService::new(&self.ctx);
        let today = at.date_naive();
        match job {
            DigestJob::DailyTop => {
                let yesterday = today - Days::new(1);
                digest.post_daily_top(yesterday).await?;
            }
            DigestJob::WeeklyReport => {
                digest.post_weekly_report(WeekWindow::previous(today)).await?;
            }
        }
        Ok(())
    }
}
