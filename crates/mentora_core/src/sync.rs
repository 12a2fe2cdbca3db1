//! Discord role sync vocabulary.

use serde::{Deserialize, Serialize};

/// Believed state of a student's community-platform role assignment.
///
/// This is a status ledger only; no Discord API traffic exists in this
/// system.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    strum::EnumIter,
)]
pub enum SyncStatus {
    /// Role assignment believed up to date
    Synced,
    /// Assignment queued or unverified
    #[default]
    Pending,
    /// Last assignment attempt reported failed
    Failed,
}

impl SyncStatus {
    /// The stored column spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStatus::Synced => "Synced",
            SyncStatus::Pending => "Pending",
            SyncStatus::Failed => "Failed",
        }
    }

    /// Parse a stored column spelling. Returns `None` for unknown values.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "Synced" => Some(SyncStatus::Synced),
            "Pending" => Some(SyncStatus::Pending),
            "Failed" => Some(SyncStatus::Failed),
            _ => None,
        }
    }
}
