//! Payment business logic
//!
//! Card payments authorize through the gateway; cash settles on the
//! spot. Either way, a successful settlement and the order's advance to
//! Preparing are persisted as one atomic unit, as are a refund and the
//! cancellation of its order.

use std::sync::Arc;

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::application::gateway::{GatewayDecision, PaymentGateway};
use crate::domain::order::OrderStatus;
use crate::domain::payment::{DayPaymentStats, Payment, PaymentMethod};
use crate::domain::RepositoryProvider;
use crate::shared::{DomainError, DomainResult};

pub struct PaymentService {
    repos: Arc<dyn RepositoryProvider>,
    gateway: Arc<dyn PaymentGateway>,
}

impl PaymentService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { repos, gateway }
    }

    /// Attempt to settle an order. A declined card attempt is a normal
    /// outcome: the Failed payment is returned and the order stays
    /// Pending so the customer can retry.
    pub async fn pay(
        &self,
        order_id: i32,
        method: PaymentMethod,
        amount: Decimal,
    ) -> DomainResult<Payment> {
        let mut order = self
            .repos
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", "id", order_id))?;

        if order.status != OrderStatus::Pending {
            return Err(DomainError::Conflict(format!(
                "order {} is {} and cannot be paid",
                order.id, order.status
            )));
        }
        if amount != order.payment_amount {
            return Err(DomainError::Conflict(format!(
                "payment amount {} does not match order amount {}",
                amount, order.payment_amount
            )));
        }
        if let Some(existing) = self.repos.payments().find_by_order(order_id).await? {
            if existing.is_completed() {
                return Err(DomainError::Conflict(format!(
                    "order {} is already paid",
                    order_id
                )));
            }
        }

        let mut payment = Payment::new_attempt(order_id, method, amount);

        match method {
            // Cash settles at the counter, no authorization round-trip
            PaymentMethod::Cash => {
                payment.complete();
                order.transition(OrderStatus::Preparing)?;
                let stored = self
                    .repos
                    .payments()
                    .record_attempt(&payment, Some(&order))
                    .await?;
                info!("Cash payment {} completed for order {}", stored.transaction_id, order_id);
                Ok(stored)
            }
            PaymentMethod::Card => {
                let decision = self
                    .gateway
                    .authorize(&payment.transaction_id, amount, method)
                    .await?;

                match decision {
                    GatewayDecision::Approved => {
                        payment.complete();
                        order.transition(OrderStatus::Preparing)?;
                        let stored = self
                            .repos
                            .payments()
                            .record_attempt(&payment, Some(&order))
                            .await?;
                        info!(
                            "Card payment {} approved for order {}",
                            stored.transaction_id, order_id
                        );
                        Ok(stored)
                    }
                    GatewayDecision::Declined { reason } => {
                        warn!(
                            "Card payment {} declined for order {}: {}",
                            payment.transaction_id, order_id, reason
                        );
                        payment.fail(reason);
                        // Order untouched; the customer can retry
                        self.repos.payments().record_attempt(&payment, None).await
                    }
                }
            }
        }
    }

    pub async fn get(&self, id: i32) -> DomainResult<Payment> {
        self.repos
            .payments()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment", "id", id))
    }

    pub async fn get_by_order(&self, order_id: i32) -> DomainResult<Payment> {
        self.repos
            .payments()
            .find_by_order(order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Payment", "order_id", order_id))
    }

    /// Refund a completed payment. On gateway approval the payment turns
    /// Refunded and the order is cancelled, together; a gateway decline
    /// surfaces as a fatal error and changes nothing.
    pub async fn refund(&self, payment_id: i32, reason: &str) -> DomainResult<Payment> {
        let mut payment = self.get(payment_id).await?;

        if !payment.can_refund() {
            return Err(DomainError::Conflict(format!(
                "payment {} is {} and cannot be refunded",
                payment.id, payment.status
            )));
        }

        let decision = self.gateway.refund(&payment.transaction_id).await?;
        match decision {
            GatewayDecision::Approved => {
                payment.refund(reason)?;

                let mut order = self
                    .repos
                    .orders()
                    .find_by_id(payment.order_id)
                    .await?
                    .ok_or_else(|| {
                        DomainError::not_found("Order", "id", payment.order_id)
                    })?;
                order.cancel_for_refund(reason);

                self.repos
                    .payments()
                    .record_refund(&payment, &order)
                    .await?;
                info!(
                    "Payment {} refunded, order {} cancelled",
                    payment.transaction_id, order.id
                );
                Ok(payment)
            }
            GatewayDecision::Declined { reason: why } => {
                warn!("Refund of {} declined: {}", payment.transaction_id, why);
                Err(DomainError::External(format!("refund declined: {why}")))
            }
        }
    }

    pub async fn today_stats(&self) -> DomainResult<DayPaymentStats> {
        let start = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .expect("midnight is a valid time")
            .and_utc();
        let end = start + Duration::days(1);
        self.repos.payments().day_stats(start, end).await
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::super::cart_service::CartService;
    use super::super::order_service::OrderService;
    use super::super::table_service::TableService;
    use super::super::test_support::{seed_menu, setup_repos};
    use super::*;
    use crate::domain::payment::PaymentStatus;
    use crate::domain::table::TableStatus;
    use crate::infrastructure::gateway::SimulatedPaymentGateway;

    struct Fixture {
        payments: PaymentService,
        orders: OrderService,
        tables: TableService,
        repos: Arc<dyn RepositoryProvider>,
    }

    async fn fixture_with_gateway(gateway: SimulatedPaymentGateway) -> Fixture {
        let repos = setup_repos().await;
        Fixture {
            payments: PaymentService::new(repos.clone(), Arc::new(gateway)),
            orders: OrderService::new(repos.clone()),
            tables: TableService::new(repos.clone()),
            repos,
        }
    }

    async fn fixture() -> Fixture {
        fixture_with_gateway(SimulatedPaymentGateway::with_rates(1.0, 1.0)).await
    }

    /// Scan a table, fill the cart (total 13_500) and place the order.
    async fn pending_order(f: &Fixture) -> crate::domain::order::Order {
        let t = f.tables.create("T1".into(), 4, None).await.unwrap();
        f.tables.scan_qr(&t.qr_code).await.unwrap();
        let menu = seed_menu(&f.repos, "americano", 4500).await;
        let carts = CartService::new(f.repos.clone());
        carts.add_item(t.id, menu.id, 3, None).await.unwrap();
        f.orders.create_from_cart(t.id, None).await.unwrap()
    }

    #[tokio::test]
    async fn cash_payment_completes_and_starts_preparation() {
        let f = fixture().await;
        let order = pending_order(&f).await;

        let payment = f
            .payments
            .pay(order.id, PaymentMethod::Cash, Decimal::from(13_500))
            .await
            .unwrap();

        assert_eq!(payment.status, PaymentStatus::Completed);
        assert!(payment.paid_at.is_some());

        let reloaded = f.orders.get(order.id).await.unwrap();
        assert_eq!(reloaded.status, OrderStatus::Preparing);
    }

    #[tokio::test]
    async fn amount_mismatch_conflicts_and_changes_nothing() {
        let f = fixture().await;
        let order = pending_order(&f).await;

        let err = f
            .payments
            .pay(order.id, PaymentMethod::Cash, Decimal::from(10_000))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let reloaded = f.orders.get(order.id).await.unwrap();
        assert_eq!(reloaded.status, OrderStatus::Pending);
        assert!(f
            .repos
            .payments()
            .find_by_order(order.id)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn card_approval_settles_payment() {
        let f = fixture().await;
        let order = pending_order(&f).await;

        let payment = f
            .payments
            .pay(order.id, PaymentMethod::Card, Decimal::from(13_500))
            .await
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(
            f.orders.get(order.id).await.unwrap().status,
            OrderStatus::Preparing
        );
    }

    #[tokio::test]
    async fn card_decline_leaves_order_payable() {
        let f = fixture_with_gateway(SimulatedPaymentGateway::with_rates(0.0, 1.0)).await;
        let order = pending_order(&f).await;

        let payment = f
            .payments
            .pay(order.id, PaymentMethod::Card, Decimal::from(13_500))
            .await
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Failed);
        assert!(payment.failure_reason.is_some());

        // Order untouched, so cash can still settle it
        let reloaded = f.orders.get(order.id).await.unwrap();
        assert_eq!(reloaded.status, OrderStatus::Pending);

        let retry = f
            .payments
            .pay(order.id, PaymentMethod::Cash, Decimal::from(13_500))
            .await
            .unwrap();
        assert_eq!(retry.status, PaymentStatus::Completed);

        // Retry reused the single payment row of the order
        assert_eq!(retry.id, payment.id);
    }

    #[tokio::test]
    async fn paying_twice_conflicts() {
        let f = fixture().await;
        let order = pending_order(&f).await;

        f.payments
            .pay(order.id, PaymentMethod::Cash, Decimal::from(13_500))
            .await
            .unwrap();
        let err = f
            .payments
            .pay(order.id, PaymentMethod::Card, Decimal::from(13_500))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn refund_cancels_order_with_payment() {
        let f = fixture().await;
        let order = pending_order(&f).await;
        let payment = f
            .payments
            .pay(order.id, PaymentMethod::Card, Decimal::from(13_500))
            .await
            .unwrap();

        let refunded = f.payments.refund(payment.id, "cold coffee").await.unwrap();
        assert_eq!(refunded.status, PaymentStatus::Refunded);

        let reloaded_payment = f.payments.get(payment.id).await.unwrap();
        assert_eq!(reloaded_payment.status, PaymentStatus::Refunded);

        let reloaded_order = f.orders.get(order.id).await.unwrap();
        assert_eq!(reloaded_order.status, OrderStatus::Cancelled);
        assert!(reloaded_order.notes.unwrap().contains("cold coffee"));
    }

    #[tokio::test]
    async fn refund_of_unsettled_payment_conflicts() {
        let f = fixture_with_gateway(SimulatedPaymentGateway::with_rates(0.0, 1.0)).await;
        let order = pending_order(&f).await;
        let failed = f
            .payments
            .pay(order.id, PaymentMethod::Card, Decimal::from(13_500))
            .await
            .unwrap();
        assert_eq!(failed.status, PaymentStatus::Failed);

        let err = f.payments.refund(failed.id, "whatever").await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn refund_decline_is_fatal_and_changes_nothing() {
        let f = fixture_with_gateway(SimulatedPaymentGateway::with_rates(1.0, 0.0)).await;
        let order = pending_order(&f).await;
        let payment = f
            .payments
            .pay(order.id, PaymentMethod::Card, Decimal::from(13_500))
            .await
            .unwrap();

        let err = f.payments.refund(payment.id, "nope").await.unwrap_err();
        assert!(matches!(err, DomainError::External(_)));

        assert_eq!(
            f.payments.get(payment.id).await.unwrap().status,
            PaymentStatus::Completed
        );
        assert_eq!(
            f.orders.get(order.id).await.unwrap().status,
            OrderStatus::Preparing
        );
    }

    #[tokio::test]
    async fn today_stats_sum_completed_payments() {
        let f = fixture().await;
        let order = pending_order(&f).await;
        f.payments
            .pay(order.id, PaymentMethod::Cash, Decimal::from(13_500))
            .await
            .unwrap();

        let stats = f.payments.today_stats().await.unwrap();
        assert_eq!(stats.completed_count, 1);
        assert_eq!(stats.completed_amount, Decimal::from(13_500));
    }

    /// The end-to-end walk-in flow: scan, cart with merge, order, cash
    /// payment, preparation through completion, table freed.
    #[tokio::test]
    async fn full_walkin_scenario() {
        let f = fixture().await;
        let carts = CartService::new(f.repos.clone());

        let t = f.tables.create("T7".into(), 4, None).await.unwrap();
        let scanned = f.tables.scan_qr(&t.qr_code).await.unwrap();
        assert_eq!(scanned.status, TableStatus::Occupied);

        let menu = seed_menu(&f.repos, "americano", 4500).await;
        let cart = carts.add_item(t.id, menu.id, 2, None).await.unwrap();
        assert_eq!(cart.total(), Decimal::from(9000));

        let cart = carts.add_item(t.id, menu.id, 1, None).await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items[0].quantity, 3);
        assert_eq!(cart.total(), Decimal::from(13_500));

        let order = f.orders.create_from_cart(t.id, None).await.unwrap();
        assert_eq!(order.total_amount, Decimal::from(13_500));
        assert!(carts.get_cart(t.id).await.unwrap().is_none());

        let payment = f
            .payments
            .pay(order.id, PaymentMethod::Cash, Decimal::from(13_500))
            .await
            .unwrap();
        assert_eq!(payment.status, PaymentStatus::Completed);
        assert_eq!(
            f.orders.get(order.id).await.unwrap().status,
            OrderStatus::Preparing
        );

        f.orders
            .update_status(order.id, OrderStatus::Ready)
            .await
            .unwrap();
        f.orders
            .update_status(order.id, OrderStatus::Completed)
            .await
            .unwrap();

        assert_eq!(
            f.tables.get(t.id).await.unwrap().status,
            TableStatus::Available
        );
    }
}
