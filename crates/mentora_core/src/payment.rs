//! Transaction vocabularies.

use serde::{Deserialize, Serialize};

/// Payment rail a transaction arrived on.
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
pub enum PaymentMethod {
    /// Stripe card payment
    Stripe,
    /// PayPal transfer
    PayPal,
    /// Manual bank transfer
    #[serde(rename = "Bank Transfer")]
    #[display("Bank Transfer")]
    BankTransfer,
    /// Cryptocurrency payment
    Crypto,
}

impl PaymentMethod {
    /// The stored column spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Stripe => "Stripe",
            PaymentMethod::PayPal => "PayPal",
            PaymentMethod::BankTransfer => "Bank Transfer",
            PaymentMethod::Crypto => "Crypto",
        }
    }

    /// Parse a stored column spelling. Returns `None` for unknown values.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "Stripe" => Some(PaymentMethod::Stripe),
            "PayPal" => Some(PaymentMethod::PayPal),
            "Bank Transfer" => Some(PaymentMethod::BankTransfer),
            "Crypto" => Some(PaymentMethod::Crypto),
            _ => None,
        }
    }
}

/// Verification state of a recorded transaction.
///
/// Independent of the student's onboarding state; nothing keeps the two in
/// sync automatically.
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
pub enum TransactionStatus {
    /// Funds confirmed
    Verified,
    /// Awaiting confirmation
    #[default]
    Pending,
    /// Charge or transfer failed
    Failed,
}

impl TransactionStatus {
    /// The stored column spelling.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Verified => "Verified",
            TransactionStatus::Pending => "Pending",
            TransactionStatus::Failed => "Failed",
        }
    }

    /// Parse a stored column spelling. Returns `None` for unknown values.
    pub fn parse_str(s: &str) -> Option<Self> {
        match s {
            "Verified" => Some(TransactionStatus::Verified),
            "Pending" => Some(TransactionStatus::Pending),
            "Failed" => Some(TransactionStatus::Failed),
            _ => None,
        }
    }
}
