//! Payment gateway port
//!
//! The core treats the gateway as an opaque, possibly slow, possibly
//! failing remote collaborator. A decline is a normal business outcome;
//! transport-level failures surface as `DomainError::External`.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::payment::PaymentMethod;
use crate::shared::DomainResult;

/// Outcome of an authorize or refund call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayDecision {
    Approved,
    Declined { reason: String },
}

impl GatewayDecision {
    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Ask the processor to authorize a charge. `transaction_ref` is the
    /// attempt-scoped id the charge is booked under.
    async fn authorize(
        &self,
        transaction_ref: &str,
        amount: Decimal,
        method: PaymentMethod,
    ) -> DomainResult<GatewayDecision>;

    /// Ask the processor to refund a previously approved charge.
    async fn refund(&self, transaction_ref: &str) -> DomainResult<GatewayDecision>;
}
