//! SeaORM implementation of PaymentRepository
//!
//! Settlement and refund both touch the payment and its order; each pair
//! of writes runs in one transaction so the two can never diverge. The
//! one-payment-per-order invariant is re-checked inside the transaction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, Set, TransactionTrait,
};

use super::order_repository::apply_order_update;
use super::{db_err, tx_err};
use crate::domain::order::Order;
use crate::domain::payment::{
    DayPaymentStats, Payment, PaymentMethod, PaymentRepository, PaymentStatus,
};
use crate::infrastructure::database::entities::payment;
use crate::shared::{DomainError, DomainResult};

// ── Conversion helpers ──────────────────────────────────────────

fn method_to_entity(m: PaymentMethod) -> payment::PaymentMethod {
    match m {
        PaymentMethod::Card => payment::PaymentMethod::Card,
        PaymentMethod::Cash => payment::PaymentMethod::Cash,
    }
}

fn status_to_entity(s: PaymentStatus) -> payment::PaymentStatus {
    match s {
        PaymentStatus::Pending => payment::PaymentStatus::Pending,
        PaymentStatus::Completed => payment::PaymentStatus::Completed,
        PaymentStatus::Failed => payment::PaymentStatus::Failed,
        PaymentStatus::Refunded => payment::PaymentStatus::Refunded,
    }
}

fn entity_to_domain(p: payment::Model) -> Payment {
    Payment {
        id: p.id,
        order_id: p.order_id,
        method: match p.method {
            payment::PaymentMethod::Card => PaymentMethod::Card,
            payment::PaymentMethod::Cash => PaymentMethod::Cash,
        },
        amount: p.amount,
        status: match p.status {
            payment::PaymentStatus::Pending => PaymentStatus::Pending,
            payment::PaymentStatus::Completed => PaymentStatus::Completed,
            payment::PaymentStatus::Failed => PaymentStatus::Failed,
            payment::PaymentStatus::Refunded => PaymentStatus::Refunded,
        },
        transaction_id: p.transaction_id,
        paid_at: p.paid_at,
        failure_reason: p.failure_reason,
        created_at: p.created_at,
        updated_at: p.updated_at,
    }
}

// ── SeaOrmPaymentRepository ─────────────────────────────────────

pub struct SeaOrmPaymentRepository {
    db: DatabaseConnection,
}

impl SeaOrmPaymentRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Write the attempt into the order's single payment row: overwrite the
/// existing non-completed row on a retry, insert otherwise.
async fn upsert_payment(
    txn: &DatabaseTransaction,
    p: &Payment,
) -> DomainResult<payment::Model> {
    let now = Utc::now();
    let existing = payment::Entity::find()
        .filter(payment::Column::OrderId.eq(p.order_id))
        .one(txn)
        .await
        .map_err(db_err)?;

    match existing {
        Some(row) if row.status == payment::PaymentStatus::Completed => Err(
            DomainError::Conflict(format!("order {} is already paid", p.order_id)),
        ),
        Some(row) => {
            let created_at = row.created_at;
            let mut model: payment::ActiveModel = row.into();
            model.method = Set(method_to_entity(p.method));
            model.amount = Set(p.amount);
            model.status = Set(status_to_entity(p.status));
            model.transaction_id = Set(p.transaction_id.clone());
            model.paid_at = Set(p.paid_at);
            model.failure_reason = Set(p.failure_reason.clone());
            model.created_at = Set(created_at);
            model.updated_at = Set(now);
            model.update(txn).await.map_err(db_err)
        }
        None => {
            let model = payment::ActiveModel {
                id: ActiveValue::NotSet,
                order_id: Set(p.order_id),
                method: Set(method_to_entity(p.method)),
                amount: Set(p.amount),
                status: Set(status_to_entity(p.status)),
                transaction_id: Set(p.transaction_id.clone()),
                paid_at: Set(p.paid_at),
                failure_reason: Set(p.failure_reason.clone()),
                created_at: Set(now),
                updated_at: Set(now),
            };
            model.insert(txn).await.map_err(db_err)
        }
    }
}

#[async_trait]
impl PaymentRepository for SeaOrmPaymentRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Payment>> {
        let model = payment::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_order(&self, order_id: i32) -> DomainResult<Option<Payment>> {
        let model = payment::Entity::find()
            .filter(payment::Column::OrderId.eq(order_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn record_attempt(
        &self,
        p: &Payment,
        order: Option<&Order>,
    ) -> DomainResult<Payment> {
        let payment_clone = p.clone();
        let order_clone = order.cloned();

        let stored = self
            .db
            .transaction::<_, payment::Model, DomainError>(move |txn| {
                Box::pin(async move {
                    let stored = upsert_payment(txn, &payment_clone).await?;
                    if let Some(order) = &order_clone {
                        apply_order_update(txn, order).await?;
                    }
                    Ok(stored)
                })
            })
            .await
            .map_err(tx_err)?;

        info!(
            "Payment attempt recorded: order={} txn={} status={:?}",
            stored.order_id, stored.transaction_id, stored.status
        );
        Ok(entity_to_domain(stored))
    }

    async fn record_refund(&self, p: &Payment, order: &Order) -> DomainResult<()> {
        let payment_clone = p.clone();
        let order_clone = order.clone();

        self.db
            .transaction::<_, (), DomainError>(move |txn| {
                Box::pin(async move {
                    let existing = payment::Entity::find_by_id(payment_clone.id)
                        .one(txn)
                        .await
                        .map_err(db_err)?
                        .ok_or_else(|| {
                            DomainError::not_found("Payment", "id", payment_clone.id)
                        })?;

                    let mut model: payment::ActiveModel = existing.into();
                    model.status = Set(status_to_entity(payment_clone.status));
                    model.failure_reason = Set(payment_clone.failure_reason.clone());
                    model.updated_at = Set(Utc::now());
                    model.update(txn).await.map_err(db_err)?;

                    apply_order_update(txn, &order_clone).await?;
                    Ok(())
                })
            })
            .await
            .map_err(tx_err)?;

        info!(
            "Payment {} refunded, order {} cancelled",
            p.transaction_id, order.id
        );
        Ok(())
    }

    async fn day_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<DayPaymentStats> {
        let payments = payment::Entity::find()
            .filter(payment::Column::Status.eq(payment::PaymentStatus::Completed))
            .filter(payment::Column::PaidAt.gte(start))
            .filter(payment::Column::PaidAt.lt(end))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        Ok(DayPaymentStats {
            completed_count: payments.len() as u64,
            completed_amount: payments.iter().map(|p| p.amount).sum(),
        })
    }
}
