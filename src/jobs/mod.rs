//! Scheduled Jobs
//!
//! Background jobs for periodic maintenance tasks.

use sqlx::PgPool;
use std::time::Duration;
use tokio::time::interval;

// =========================================================================
// Expired Session Cleanup Job
// =========================================================================

/// Delete session rows whose expiry has passed.
///
/// The auth middleware already refuses expired sessions; this job keeps the
/// table from growing without bound.
pub async fn cleanup_expired_sessions(pool: &PgPool) -> Result<u64, JobError> {
    let result = sqlx::query(
        r#"
        DELETE FROM sessions
        WHERE expires_at < NOW()
        "#,
    )
    .execute(pool)
    .await?;

    let rows_deleted = result.rows_affected();

    if rows_deleted > 0 {
        tracing::info!(rows_deleted = rows_deleted, "Deleted expired sessions");
    }

    Ok(rows_deleted)
}

// =========================================================================
// Job Scheduler
// =========================================================================

/// Configuration for job scheduler
#[derive(Debug, Clone)]
pub struct JobSchedulerConfig {
    /// Interval for expired-session cleanup (default: 1 hour)
    pub session_cleanup_interval: Duration,
}

impl Default for JobSchedulerConfig {
    fn default() -> Self {
        Self {
            session_cleanup_interval: Duration::from_secs(3600),
        }
    }
}

/// Job Scheduler - runs periodic maintenance tasks
pub struct JobScheduler {
    pool: PgPool,
    config: JobSchedulerConfig,
}

impl JobScheduler {
    /// Create a new job scheduler
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            config: JobSchedulerConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(pool: PgPool, config: JobSchedulerConfig) -> Self {
        Self { pool, config }
    }

    /// Start the job scheduler in the background
    /// Returns a handle that can be used to abort the scheduler
    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// Run the scheduler loop
    async fn run(&self) {
        tracing::info!(
            interval_secs = self.config.session_cleanup_interval.as_secs(),
            "Job scheduler started"
        );

        let mut cleanup_interval = interval(self.config.session_cleanup_interval);

        loop {
            cleanup_interval.tick().await;
            if let Err(e) = cleanup_expired_sessions(&self.pool).await {
                tracing::error!(error = %e, "Session cleanup failed");
            }
        }
    }

    /// Run the cleanup once (for manual trigger or testing)
    pub async fn run_once(&self) -> Result<u64, JobError> {
        cleanup_expired_sessions(&self.pool).await
    }
}

/// Job execution errors
#[derive(Debug, thiserror::Error)]
pub enum JobError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_scheduler_config_default() {
        let config = JobSchedulerConfig::default();
        assert_eq!(config.session_cleanup_interval, Duration::from_secs(3600));
    }
}
