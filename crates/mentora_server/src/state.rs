//! Shared state for request handlers.

use diesel::pg::PgConnection;
use mentora_database::{
    DiscordRoleRepository, MetricsRepository, NotificationRepository, SettingsRepository,
    SystemLogRepository, TransactionRepository,
};
use mentora_lifecycle::LifecycleService;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Application state shared across handlers.
///
/// All repositories share one connection; see the repository docs for the
/// concurrency caveats.
#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<LifecycleService>,
    pub transactions: Arc<TransactionRepository>,
    pub discord_roles: Arc<DiscordRoleRepository>,
    pub logs: Arc<SystemLogRepository>,
    pub metrics: Arc<MetricsRepository>,
    pub notifications: Arc<NotificationRepository>,
    pub settings: Arc<SettingsRepository>,
}

impl AppState {
    /// Build state over a fresh connection.
    pub fn new(conn: PgConnection) -> Self {
        Self::from_arc(Arc::new(Mutex::new(conn)))
    }

    /// Build state over a shared connection.
    pub fn from_arc(conn: Arc<Mutex<PgConnection>>) -> Self {
        Self {
            lifecycle: Arc::new(LifecycleService::from_arc(conn.clone())),
            transactions: Arc::new(TransactionRepository::from_arc(conn.clone())),
            discord_roles: Arc::new(DiscordRoleRepository::from_arc(conn.clone())),
            logs: Arc::new(SystemLogRepository::from_arc(conn.clone())),
            metrics: Arc::new(MetricsRepository::from_arc(conn.clone())),
            notifications: Arc::new(NotificationRepository::from_arc(conn.clone())),
            settings: Arc::new(SettingsRepository::from_arc(conn)),
        }
    }
}
