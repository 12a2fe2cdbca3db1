//! Student status vocabularies.
//!
//! The legacy system stored these as free strings; here each one is a closed
//! enum. Columns keep the legacy spellings, so the `as_str`/`parse_str`
//! pairs below are the only place the wire spellings appear.

use serde::{Deserialize, Serialize};

/// Payment standing of a student.
///
/// # Examples
///
/// ```
/// use mentora_core::PaymentStatus;
///
/// assert_eq!(PaymentStatus::default(), PaymentStatus::Pending);
/// assert_eq!(PaymentStatus::Paid.as_str(), "Paid");
/// assert_eq!(PaymentStatus::parse_str("Failed"), Some(PaymentStatus::Failed));
/// assert_eq!(PaymentStatus::parse_str("bogus"), None);
/// ```
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
pub enum PaymentStatus {
    /// Tuition settled for the current period
    Paid,
    /// Awaiting payment or verification
    #[default]
    Pending,
    /// Last charge attempt failed
    Failed,
}

impl PaymentStatus {
    /// The stored column spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Paid => "Paid",
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Failed => "Failed",
        }
    }

    /// Parse a stored column spelling. Returns `None` for unknown values.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "Paid" => Some(PaymentStatus::Paid),
            "Pending" => Some(PaymentStatus::Pending),
            "Failed" => Some(PaymentStatus::Failed),
            _ => None,
        }
    }
}

/// Coarse lifecycle stage of a student's onboarding.
///
/// Partly derived from timeline step completion; see
/// [`derive_onboarding_status`](crate::derive_onboarding_status).
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
pub enum OnboardingStatus {
    /// No onboarding milestone reached yet
    #[default]
    #[serde(rename = "Not Started")]
    #[display("Not Started")]
    NotStarted,
    /// At least one milestone completed
    #[serde(rename = "In Progress")]
    #[display("In Progress")]
    InProgress,
    /// Every milestone completed
    Completed,
}

impl OnboardingStatus {
    /// The stored column spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            OnboardingStatus::NotStarted => "Not Started",
            OnboardingStatus::InProgress => "In Progress",
            OnboardingStatus::Completed => "Completed",
        }
    }

    /// Parse a stored column spelling. Returns `None` for unknown values.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "Not Started" => Some(OnboardingStatus::NotStarted),
            "In Progress" => Some(OnboardingStatus::InProgress),
            "Completed" => Some(OnboardingStatus::Completed),
            _ => None,
        }
    }
}

/// State of a single onboarding timeline step.
///
/// Stored and serialized lowercase, matching the legacy wire format.
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
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Milestone reached
    #[display("completed")]
    Completed,
    /// The step the student is presently on
    #[display("current")]
    Current,
    /// Not yet reached
    #[display("pending")]
    Pending,
    /// Attempted and failed; excluded from status derivation
    #[display("failed")]
    Failed,
}

impl StepStatus {
    /// The stored column spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Completed => "completed",
            StepStatus::Current => "current",
            StepStatus::Pending => "pending",
            StepStatus::Failed => "failed",
        }
    }

    /// Parse a stored column spelling. Returns `None` for unknown values.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "completed" => Some(StepStatus::Completed),
            "current" => Some(StepStatus::Current),
            "pending" => Some(StepStatus::Pending),
            "failed" => Some(StepStatus::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn payment_status_round_trips() {
        for status in PaymentStatus::iter() {
            assert_eq!(PaymentStatus::parse_str(status.as_str()), Some(status));
        }
        assert_eq!(PaymentStatus::parse_str("paid"), None);
    }

    #[test]
    fn onboarding_status_round_trips() {
        for status in OnboardingStatus::iter() {
            assert_eq!(OnboardingStatus::parse_str(status.as_str()), Some(status));
        }
        assert_eq!(OnboardingStatus::parse_str("NotStarted"), None);
    }

    #[test]
    fn step_status_round_trips() {
        for status in StepStatus::iter() {
            assert_eq!(StepStatus::parse_str(status.as_str()), Some(status));
        }
    }

    #[test]
    fn wire_spellings_keep_spaces() {
        let json = serde_json::to_string(&OnboardingStatus::NotStarted).unwrap();
        assert_eq!(json, "\"Not Started\"");
        let back: OnboardingStatus = serde_json::from_str("\"In Progress\"").unwrap();
        assert_eq!(back, OnboardingStatus::InProgress);
    }
}
