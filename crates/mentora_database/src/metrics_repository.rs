//! PostgreSQL repository for the operational metrics fixtures.
//!
//! Each table is a config-equivalent fixture: the read path seeds static
//! sample rows when the table is empty and re-reads.

use crate::schema::{inquiry_themes, insights, message_volumes, response_metrics};
use crate::{
    DatabaseResult, InquiryThemeRow, InsightRow, MessageVolumeRow, NewInquiryThemeRow,
    NewInsightRow, NewMessageVolumeRow, NewResponseMetricRow, ResponseMetricRow,
};

use chrono::{Duration, Utc};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use mentora_error::DatabaseError;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::instrument;

/// PostgreSQL repository for operational metrics.
pub struct MetricsRepository {
    conn: Arc<Mutex<PgConnection>>,
}

impl MetricsRepository {
    /// Create a new metrics repository.
    pub fn new(conn: PgConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Create a repository from an Arc<Mutex<PgConnection>> (for sharing connections).
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self { conn }
    }

    /// Latest response metrics, seeding samples when the table is empty.
    #[instrument(skip(self))]
    pub async fn response_metrics(&self, limit: i64) -> DatabaseResult<Vec<ResponseMetricRow>> {
        let mut conn = self.conn.lock().await;

        let rows: Vec<ResponseMetricRow> = response_metrics::table
            .order(response_metrics::measured_on.desc())
            .limit(limit)
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        if !rows.is_empty() {
            return Ok(rows);
        }

        tracing::debug!("Seeding response_metrics with sample rows");
        let today = Utc::now().date_naive();
        let samples: Vec<NewResponseMetricRow> = [42.0, 35.5, 28.0, 31.5, 24.0, 19.5, 22.0]
            .iter()
            .enumerate()
            .map(|(idx, minutes)| NewResponseMetricRow {
                avg_response_minutes: *minutes,
                measured_on: today - Duration::days(idx as i64),
            })
            .collect();
        diesel::insert_into(response_metrics::table)
            .values(&samples)
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        response_metrics::table
            .order(response_metrics::measured_on.desc())
            .limit(limit)
            .load(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Latest message volumes, seeding samples when the table is empty.
    #[instrument(skip(self))]
    pub async fn message_volumes(&self, limit: i64) -> DatabaseResult<Vec<MessageVolumeRow>> {
        let mut conn = self.conn.lock().await;

        let rows: Vec<MessageVolumeRow> = message_volumes::table
            .order(message_volumes::recorded_on.desc())
            .limit(limit)
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        if !rows.is_empty() {
            return Ok(rows);
        }

        tracing::debug!("Seeding message_volumes with sample rows");
        let today = Utc::now().date_naive();
        let samples: Vec<NewMessageVolumeRow> = [
            ("general", 342),
            ("support", 187),
            ("trading-floor", 560),
            ("announcements", 48),
        ]
        .iter()
        .map(|(channel, count)| NewMessageVolumeRow {
            channel: channel.to_string(),
            message_count: *count,
            recorded_on: today,
        })
        .collect();
        diesel::insert_into(message_volumes::table)
            .values(&samples)
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        message_volumes::table
            .order(message_volumes::recorded_on.desc())
            .limit(limit)
            .load(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Latest inquiry themes, seeding samples when the table is empty.
    #[instrument(skip(self))]
    pub async fn inquiry_themes(&self, limit: i64) -> DatabaseResult<Vec<InquiryThemeRow>> {
        let mut conn = self.conn.lock().await;

        let rows: Vec<InquiryThemeRow> = inquiry_themes::table
            .order(inquiry_themes::inquiry_count.desc())
            .limit(limit)
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        if !rows.is_empty() {
            return Ok(rows);
        }

        tracing::debug!("Seeding inquiry_themes with sample rows");
        let samples: Vec<NewInquiryThemeRow> = [
            ("Payment issues", 34),
            ("Discord access", 27),
            ("Course content", 21),
            ("Refund requests", 9),
        ]
        .iter()
        .map(|(theme, count)| NewInquiryThemeRow {
            theme: theme.to_string(),
            inquiry_count: *count,
        })
        .collect();
        diesel::insert_into(inquiry_themes::table)
            .values(&samples)
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        inquiry_themes::table
            .order(inquiry_themes::inquiry_count.desc())
            .limit(limit)
            .load(&mut *conn)
            .map_err(DatabaseError::from)
    }

    /// Latest insights, seeding samples when the table is empty.
    #[instrument(skip(self))]
    pub async fn insights(&self, limit: i64) -> DatabaseResult<Vec<InsightRow>> {
        let mut conn = self.conn.lock().await;

        let rows: Vec<InsightRow> = insights::table
            .order(insights::created_at.desc())
            .limit(limit)
            .load(&mut *conn)
            .map_err(DatabaseError::from)?;
        if !rows.is_empty() {
            return Ok(rows);
        }

        tracing::debug!("Seeding insights with sample rows");
        let samples: Vec<NewInsightRow> = [
            (
                "Response times improving",
                "Average first-response time dropped 18% week over week.",
                Some("support"),
            ),
            (
                "Payment failures concentrated on renewals",
                "Most failed charges are second-month renewals on expired cards.",
                Some("payments"),
            ),
            (
                "Discord onboarding lag",
                "Role assignment is the slowest timeline step for new students.",
                Some("onboarding"),
            ),
        ]
        .iter()
        .map(|(title, body, category)| NewInsightRow {
            title: title.to_string(),
            body: body.to_string(),
            category: category.map(str::to_string),
        })
        .collect();
        diesel::insert_into(insights::table)
            .values(&samples)
            .execute(&mut *conn)
            .map_err(DatabaseError::from)?;

        insights::table
            .order(insights::created_at.desc())
            .limit(limit)
            .load(&mut *conn)
            .map_err(DatabaseError::from)
    }
}
