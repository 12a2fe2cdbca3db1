//! System log severity vocabulary.

use serde::{Deserialize, Serialize};

/// Severity of an append-only system log entry.
///
/// Stored and serialized upper-case, matching the legacy log viewer.
#[derive(
    Debug,
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
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    /// Routine event
    #[display("INFO")]
    Info,
    /// Desirable outcome (payment landed, onboarding finished)
    #[display("SUCCESS")]
    Success,
    /// Needs operator attention
    #[display("WARNING")]
    Warning,
    /// Failure recorded
    #[display("ERROR")]
    Error,
}

impl LogLevel {
    /// The stored column spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Info => "INFO",
            LogLevel::Success => "SUCCESS",
            LogLevel::Warning => "WARNING",
            LogLevel::Error => "ERROR",
        }
    }

    /// Parse a stored column spelling. Returns `None` for unknown values.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "INFO" => Some(LogLevel::Info),
            "SUCCESS" => Some(LogLevel::Success),
            "WARNING" => Some(LogLevel::Warning),
            "ERROR" => Some(LogLevel::Error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn level_round_trips() {
        for level in LogLevel::iter() {
            assert_eq!(LogLevel::parse_str(level.as_str()), Some(level));
        }
        assert_eq!(LogLevel::parse_str("info"), None);
    }
}
