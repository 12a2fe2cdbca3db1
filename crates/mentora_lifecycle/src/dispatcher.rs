//! Audit outbox dispatcher.
//!
//! Drains undispatched outbox rows into the system log. Delivery is
//! at-least-once: a row whose log append succeeds but whose acknowledgement
//! fails is rendered again on the next pass.

use diesel::pg::PgConnection;
use mentora_core::render_event;
use mentora_database::{NewSystemLogRow, OutboxRepository, SystemLogRepository};
use mentora_error::MentoraResult;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::instrument;

/// Rows drained per pass.
const BATCH_SIZE: i64 = 100;

/// Result of one drain pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DrainReport {
    /// Rows rendered and acknowledged
    pub dispatched: usize,
    /// Rows that failed and were left for the next pass
    pub failed: usize,
}

/// Reads the audit outbox and appends rendered entries to the system log.
pub struct OutboxDispatcher {
    outbox: OutboxRepository,
    logs: SystemLogRepository,
}

impl OutboxDispatcher {
    /// Create a dispatcher over a shared connection.
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self {
            outbox: OutboxRepository::from_arc(conn.clone()),
            logs: SystemLogRepository::from_arc(conn),
        }
    }

    /// Drain one batch of undispatched rows.
    ///
    /// Each row is rendered through the static audit mapping and appended to
    /// the system log; failures are recorded on the row and retried on the
    /// next pass.
    #[instrument(skip(self))]
    pub async fn drain_once(&self) -> MentoraResult<DrainReport> {
        let rows = self.outbox.undispatched(BATCH_SIZE).await?;
        let mut report = DrainReport::default();

        for row in rows {
            let rendered = render_event(row.kind(), &row.payload);

            let log_row = NewSystemLogRow {
                level: rendered.level.as_str().to_string(),
                module: rendered.module.to_string(),
                message: rendered.message,
                context: Some(row.payload.clone()),
                user_id: None,
                student_id: row.student_id,
            };

            match self.logs.append(log_row).await {
                Ok(_) => {
                    self.outbox.mark_dispatched(row.id).await?;
                    report.dispatched += 1;
                }
                Err(e) => {
                    tracing::warn!(
                        outbox_id = row.id,
                        error = %e,
                        "Failed to dispatch audit event; leaving for retry"
                    );
                    self.outbox.mark_failed(row.id, &e.to_string()).await?;
                    report.failed += 1;
                }
            }
        }

        if report.dispatched > 0 || report.failed > 0 {
            tracing::debug!(
                dispatched = report.dispatched,
                failed = report.failed,
                "Outbox drain pass complete"
            );
        }

        Ok(report)
    }

    /// Run drain passes on a fixed interval until the task is aborted.
    #[instrument(skip(self))]
    pub async fn run(self, interval: Duration) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if let Err(e) = self.drain_once().await {
                tracing::error!(error = %e, "Outbox drain pass failed");
            }
        }
    }
}
