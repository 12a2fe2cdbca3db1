//! Operational metrics, notification, and settings row models.
//!
//! The metrics tables are config-equivalent fixtures: the repositories seed
//! them with static sample rows when empty.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Database row for the response_metrics table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::response_metrics)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ResponseMetricRow {
    pub id: i32,
    pub avg_response_minutes: f64,
    pub measured_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for the response_metrics table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::response_metrics)]
pub struct NewResponseMetricRow {
    pub avg_response_minutes: f64,
    pub measured_on: NaiveDate,
}

/// Database row for the message_volumes table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::message_volumes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct MessageVolumeRow {
    pub id: i32,
    pub channel: String,
    pub message_count: i32,
    pub recorded_on: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for the message_volumes table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::message_volumes)]
pub struct NewMessageVolumeRow {
    pub channel: String,
    pub message_count: i32,
    pub recorded_on: NaiveDate,
}

/// Database row for the inquiry_themes table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::inquiry_themes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InquiryThemeRow {
    pub id: i32,
    pub theme: String,
    pub inquiry_count: i32,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for the inquiry_themes table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::inquiry_themes)]
pub struct NewInquiryThemeRow {
    pub theme: String,
    pub inquiry_count: i32,
}

/// Database row for the insights table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::insights)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct InsightRow {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for the insights table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::insights)]
pub struct NewInsightRow {
    pub title: String,
    pub body: String,
    pub category: Option<String>,
}

/// Database row for the notifications table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct NotificationRow {
    pub id: i32,
    pub title: String,
    pub body: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for the notifications table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::notifications)]
pub struct NewNotificationRow {
    pub title: String,
    pub body: String,
    pub read: bool,
}

/// Database row for the settings table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = crate::schema::settings)]
#[diesel(primary_key(key))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SettingRow {
    pub key: String,
    pub value: serde_json::Value,
    pub updated_at: DateTime<Utc>,
}

/// Insertable struct for the settings table.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::settings)]
pub struct NewSettingRow {
    pub key: String,
    pub value: serde_json::Value,
}
