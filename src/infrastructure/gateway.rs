//! Simulated payment gateway
//!
//! Stands in for the real processor: approves a configurable fraction of
//! authorize and refund calls at random. Tests pin the rates to 1.0 or
//! 0.0 to force either outcome.

use async_trait::async_trait;
use rand::Rng;
use rust_decimal::Decimal;
use tracing::debug;

use crate::application::gateway::{GatewayDecision, PaymentGateway};
use crate::domain::payment::PaymentMethod;
use crate::shared::DomainResult;

pub struct SimulatedPaymentGateway {
    authorize_approval_rate: f64,
    refund_approval_rate: f64,
}

impl SimulatedPaymentGateway {
    pub fn new() -> Self {
        Self {
            authorize_approval_rate: 0.95,
            refund_approval_rate: 0.98,
        }
    }

    /// Fix the approval rates, mainly for tests (1.0 always approves,
    /// 0.0 always declines).
    pub fn with_rates(authorize_approval_rate: f64, refund_approval_rate: f64) -> Self {
        Self {
            authorize_approval_rate,
            refund_approval_rate,
        }
    }

    fn roll(rate: f64) -> bool {
        rand::thread_rng().gen::<f64>() < rate
    }
}

impl Default for SimulatedPaymentGateway {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PaymentGateway for SimulatedPaymentGateway {
    async fn authorize(
        &self,
        transaction_ref: &str,
        amount: Decimal,
        method: PaymentMethod,
    ) -> DomainResult<GatewayDecision> {
        let approved = Self::roll(self.authorize_approval_rate);
        debug!(
            "Gateway authorize {} {} via {}: {}",
            transaction_ref,
            amount,
            method,
            if approved { "approved" } else { "declined" }
        );

        Ok(if approved {
            GatewayDecision::Approved
        } else {
            GatewayDecision::Declined {
                reason: "authorization declined".to_string(),
            }
        })
    }

    async fn refund(&self, transaction_ref: &str) -> DomainResult<GatewayDecision> {
        let approved = Self::roll(self.refund_approval_rate);
        debug!(
            "Gateway refund {}: {}",
            transaction_ref,
            if approved { "approved" } else { "declined" }
        );

        Ok(if approved {
            GatewayDecision::Approved
        } else {
            GatewayDecision::Declined {
                reason: "refund declined".to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pinned_rates_force_outcomes() {
        let always = SimulatedPaymentGateway::with_rates(1.0, 1.0);
        let never = SimulatedPaymentGateway::with_rates(0.0, 0.0);

        let amount = Decimal::from(13_500);
        assert!(always
            .authorize("TXN1", amount, PaymentMethod::Card)
            .await
            .unwrap()
            .is_approved());
        assert!(!never
            .authorize("TXN2", amount, PaymentMethod::Card)
            .await
            .unwrap()
            .is_approved());
        assert!(always.refund("TXN1").await.unwrap().is_approved());
        assert!(!never.refund("TXN2").await.unwrap().is_approved());
    }
}
