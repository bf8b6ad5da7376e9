//! Payment domain entity
//!
//! One settlement attempt per order. The transaction id identifies the
//! attempt towards the gateway; it is not a security token.

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;

use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentMethod {
    Card,
    Cash,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Card => "CARD",
            Self::Cash => "CASH",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "CARD" => Some(Self::Card),
            "CASH" => Some(Self::Cash),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Refunded => "REFUNDED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(Self::Pending),
            "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            "REFUNDED" => Some(Self::Refunded),
            _ => None,
        }
    }
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Payment {
    pub id: i32,
    pub order_id: i32,
    pub method: PaymentMethod,
    pub amount: Decimal,
    pub status: PaymentStatus,
    /// Attempt-scoped identifier: TXN + epoch millis + random suffix
    pub transaction_id: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Payment {
    /// Start a new attempt in Pending with a fresh transaction id.
    pub fn new_attempt(order_id: i32, method: PaymentMethod, amount: Decimal) -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            order_id,
            method,
            amount,
            status: PaymentStatus::Pending,
            transaction_id: generate_transaction_id(),
            paid_at: None,
            failure_reason: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn complete(&mut self) {
        self.status = PaymentStatus::Completed;
        self.paid_at = Some(Utc::now());
        self.failure_reason = None;
    }

    pub fn fail(&mut self, reason: impl Into<String>) {
        self.status = PaymentStatus::Failed;
        self.failure_reason = Some(reason.into());
    }

    pub fn can_refund(&self) -> bool {
        self.status == PaymentStatus::Completed
    }

    /// Only a completed payment can be refunded.
    pub fn refund(&mut self, reason: &str) -> DomainResult<()> {
        if !self.can_refund() {
            return Err(DomainError::Conflict(format!(
                "payment {} is {} and cannot be refunded",
                self.id, self.status
            )));
        }
        self.status = PaymentStatus::Refunded;
        self.failure_reason = Some(format!("refund: {reason}"));
        Ok(())
    }

    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }
}

/// Attempt-scoped transaction id: unique enough to name one attempt, not
/// globally unique and not a secret.
pub fn generate_transaction_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = {
        let mut rng = rand::thread_rng();
        (0..8)
            .map(|_| {
                let n: u8 = rng.gen_range(0..16);
                std::char::from_digit(n as u32, 16).unwrap().to_ascii_uppercase()
            })
            .collect()
    };
    format!("TXN{millis}{suffix}")
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn attempt() -> Payment {
        Payment::new_attempt(1, PaymentMethod::Card, Decimal::from(13_500))
    }

    #[test]
    fn new_attempt_is_pending_with_txn_id() {
        let p = attempt();
        assert_eq!(p.status, PaymentStatus::Pending);
        assert!(p.transaction_id.starts_with("TXN"));
        assert!(p.paid_at.is_none());
        assert!(p.failure_reason.is_none());
    }

    #[test]
    fn complete_sets_paid_at() {
        let mut p = attempt();
        p.complete();
        assert_eq!(p.status, PaymentStatus::Completed);
        assert!(p.paid_at.is_some());
        assert!(p.is_completed());
    }

    #[test]
    fn fail_records_reason() {
        let mut p = attempt();
        p.fail("card declined");
        assert_eq!(p.status, PaymentStatus::Failed);
        assert_eq!(p.failure_reason.as_deref(), Some("card declined"));
    }

    #[test]
    fn refund_requires_completed() {
        let mut p = attempt();
        assert!(!p.can_refund());
        let err = p.refund("wrong order").unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert_eq!(p.status, PaymentStatus::Pending);

        p.complete();
        p.refund("wrong order").unwrap();
        assert_eq!(p.status, PaymentStatus::Refunded);
        assert_eq!(p.failure_reason.as_deref(), Some("refund: wrong order"));
    }

    #[test]
    fn refund_twice_fails() {
        let mut p = attempt();
        p.complete();
        p.refund("first").unwrap();
        assert!(p.refund("second").is_err());
        assert_eq!(p.status, PaymentStatus::Refunded);
    }

    #[test]
    fn transaction_ids_differ_per_attempt() {
        let a = generate_transaction_id();
        let b = generate_transaction_id();
        assert_ne!(a, b);
        assert!(a.len() > "TXN".len() + 8);
    }

    #[test]
    fn method_and_status_roundtrip() {
        for m in [PaymentMethod::Card, PaymentMethod::Cash] {
            assert_eq!(PaymentMethod::parse(m.as_str()), Some(m));
        }
        for s in [
            PaymentStatus::Pending,
            PaymentStatus::Completed,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(PaymentStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(PaymentMethod::parse("MOBILE"), None);
    }
}
