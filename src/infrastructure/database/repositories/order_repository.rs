//! SeaORM implementation of OrderRepository
//!
//! Order creation snapshots the cart and deletes it in one transaction;
//! a crash between the two cannot duplicate or lose the order. The cart
//! is re-read inside the transaction so a concurrently emptied cart
//! fails the creation instead of producing an empty order.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use log::info;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::table_repository;
use super::{db_err, tx_err};
use crate::domain::cart::Cart;
use crate::domain::order::{
    DayOrderStats, Order, OrderItem, OrderRepository, OrderStatus, OrderStatusCounts,
};
use crate::domain::table::CafeTable;
use crate::infrastructure::database::entities::{cart, cart_item, menu, order, order_item, table};
use crate::shared::{DomainError, DomainResult};

// ── Conversion helpers ──────────────────────────────────────────

pub(crate) fn status_to_entity(s: OrderStatus) -> order::OrderStatus {
    match s {
        OrderStatus::Pending => order::OrderStatus::Pending,
        OrderStatus::Preparing => order::OrderStatus::Preparing,
        OrderStatus::Ready => order::OrderStatus::Ready,
        OrderStatus::Completed => order::OrderStatus::Completed,
        OrderStatus::Cancelled => order::OrderStatus::Cancelled,
    }
}

pub(crate) fn status_to_domain(s: &order::OrderStatus) -> OrderStatus {
    match s {
        order::OrderStatus::Pending => OrderStatus::Pending,
        order::OrderStatus::Preparing => OrderStatus::Preparing,
        order::OrderStatus::Ready => OrderStatus::Ready,
        order::OrderStatus::Completed => OrderStatus::Completed,
        order::OrderStatus::Cancelled => OrderStatus::Cancelled,
    }
}

fn entity_to_domain(o: order::Model, items: Vec<OrderItem>) -> Order {
    Order {
        id: o.id,
        table_id: o.table_id,
        items,
        total_amount: o.total_amount,
        used_points: o.used_points,
        payment_amount: o.payment_amount,
        status: status_to_domain(&o.status),
        notes: o.notes,
        created_at: o.created_at,
        updated_at: o.updated_at,
    }
}

/// Update the persisted status/notes of an order on any connection
/// (plain or transactional).
pub(crate) async fn apply_order_update<C: ConnectionTrait>(
    conn: &C,
    o: &Order,
) -> DomainResult<()> {
    let existing = order::Entity::find_by_id(o.id)
        .one(conn)
        .await
        .map_err(db_err)?
        .ok_or_else(|| DomainError::not_found("Order", "id", o.id))?;

    let mut model: order::ActiveModel = existing.into();
    model.status = Set(status_to_entity(o.status));
    model.notes = Set(o.notes.clone());
    model.updated_at = Set(Utc::now());
    model.update(conn).await.map_err(db_err)?;
    Ok(())
}

// ── SeaOrmOrderRepository ───────────────────────────────────────

pub struct SeaOrmOrderRepository {
    db: DatabaseConnection,
}

impl SeaOrmOrderRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn load_items(&self, order_ids: &[i32]) -> DomainResult<HashMap<i32, Vec<OrderItem>>> {
        if order_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = order_item::Entity::find()
            .filter(order_item::Column::OrderId.is_in(order_ids.to_vec()))
            .order_by_asc(order_item::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let menu_ids: Vec<i32> = rows.iter().map(|i| i.menu_id).collect();
        let menu_names: HashMap<i32, String> = if menu_ids.is_empty() {
            HashMap::new()
        } else {
            menu::Entity::find()
                .filter(menu::Column::Id.is_in(menu_ids))
                .all(&self.db)
                .await
                .map_err(db_err)?
                .into_iter()
                .map(|m| (m.id, m.name))
                .collect()
        };

        let mut by_order: HashMap<i32, Vec<OrderItem>> = HashMap::new();
        for row in rows {
            by_order.entry(row.order_id).or_default().push(OrderItem {
                id: row.id,
                order_id: row.order_id,
                menu_id: row.menu_id,
                menu_name: menu_names.get(&row.menu_id).cloned().unwrap_or_default(),
                quantity: row.quantity,
                unit_price: row.unit_price,
                subtotal: row.subtotal,
                notes: row.notes,
            });
        }
        Ok(by_order)
    }

    async fn hydrate(&self, models: Vec<order::Model>) -> DomainResult<Vec<Order>> {
        let ids: Vec<i32> = models.iter().map(|m| m.id).collect();
        let mut items = self.load_items(&ids).await?;
        Ok(models
            .into_iter()
            .map(|m| {
                let order_items = items.remove(&m.id).unwrap_or_default();
                entity_to_domain(m, order_items)
            })
            .collect())
    }
}

#[async_trait]
impl OrderRepository for SeaOrmOrderRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Order>> {
        let model = order::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(model) = model else {
            return Ok(None);
        };
        Ok(self.hydrate(vec![model]).await?.pop())
    }

    async fn find_active_by_table(&self, table_id: i32) -> DomainResult<Vec<Order>> {
        let models = order::Entity::find()
            .filter(order::Column::TableId.eq(table_id))
            .filter(order::Column::Status.is_in([
                order::OrderStatus::Pending,
                order::OrderStatus::Preparing,
                order::OrderStatus::Ready,
            ]))
            .order_by_asc(order::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        self.hydrate(models).await
    }

    async fn list(
        &self,
        status: Option<OrderStatus>,
        page: u64,
        limit: u64,
    ) -> DomainResult<(Vec<Order>, u64)> {
        let mut query = order::Entity::find();
        if let Some(status) = status {
            query = query.filter(order::Column::Status.eq(status_to_entity(status)));
        }

        let paginator = query
            .order_by_desc(order::Column::CreatedAt)
            .paginate(&self.db, limit);

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_err)?;
        let orders = self.hydrate(models).await?;
        Ok((orders, total))
    }

    async fn create_from_cart(
        &self,
        table_id: i32,
        cart_snapshot: &Cart,
        notes: Option<String>,
    ) -> DomainResult<Order> {
        let cart_id = cart_snapshot.id;

        let order_id = self
            .db
            .transaction::<_, i32, DomainError>(move |txn| {
                Box::pin(async move {
                    let now = Utc::now();

                    // Re-read the cart inside the transaction; the
                    // snapshot may be stale.
                    let lines = cart_item::Entity::find()
                        .filter(cart_item::Column::CartId.eq(cart_id))
                        .order_by_asc(cart_item::Column::Id)
                        .all(txn)
                        .await
                        .map_err(db_err)?;

                    if lines.is_empty() {
                        return Err(DomainError::Conflict(
                            "cart is empty, nothing to order".into(),
                        ));
                    }

                    let total: Decimal = lines
                        .iter()
                        .map(|l| l.unit_price * Decimal::from(l.quantity))
                        .sum();

                    let order_model = order::ActiveModel {
                        id: ActiveValue::NotSet,
                        table_id: Set(table_id),
                        total_amount: Set(total),
                        used_points: Set(Decimal::ZERO),
                        payment_amount: Set(total),
                        status: Set(order::OrderStatus::Pending),
                        notes: Set(notes),
                        created_at: Set(now),
                        updated_at: Set(now),
                    };
                    let created = order_model.insert(txn).await.map_err(db_err)?;

                    for line in &lines {
                        let item = order_item::ActiveModel {
                            id: ActiveValue::NotSet,
                            order_id: Set(created.id),
                            menu_id: Set(line.menu_id),
                            quantity: Set(line.quantity),
                            unit_price: Set(line.unit_price),
                            subtotal: Set(line.unit_price * Decimal::from(line.quantity)),
                            notes: Set(line.notes.clone()),
                            created_at: Set(now),
                            updated_at: Set(now),
                        };
                        item.insert(txn).await.map_err(db_err)?;
                    }

                    // Drain the source cart in the same unit of work
                    cart_item::Entity::delete_many()
                        .filter(cart_item::Column::CartId.eq(cart_id))
                        .exec(txn)
                        .await
                        .map_err(db_err)?;
                    cart::Entity::delete_by_id(cart_id)
                        .exec(txn)
                        .await
                        .map_err(db_err)?;

                    Ok(created.id)
                })
            })
            .await
            .map_err(tx_err)?;

        info!("Order {} created from cart of table {}", order_id, table_id);

        self.find_by_id(order_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Order", "id", order_id))
    }

    async fn update_status(&self, o: &Order) -> DomainResult<()> {
        apply_order_update(&self.db, o).await?;
        info!("Order {} status updated to {}", o.id, o.status);
        Ok(())
    }

    async fn update_status_and_release_table(
        &self,
        o: &Order,
        t: &CafeTable,
    ) -> DomainResult<()> {
        let order_clone = o.clone();
        let table_id = t.id;
        let table_status = t.status;

        self.db
            .transaction::<_, (), DomainError>(move |txn| {
                Box::pin(async move {
                    apply_order_update(txn, &order_clone).await?;

                    let existing = table::Entity::find_by_id(table_id)
                        .one(txn)
                        .await
                        .map_err(db_err)?
                        .ok_or_else(|| DomainError::not_found("Table", "id", table_id))?;

                    let mut model: table::ActiveModel = existing.into();
                    model.status = Set(table_repository::status_to_entity(table_status));
                    model.updated_at = Set(Utc::now());
                    model.update(txn).await.map_err(db_err)?;
                    Ok(())
                })
            })
            .await
            .map_err(tx_err)?;

        info!("Order {} completed, table {} released", o.id, t.id);
        Ok(())
    }

    async fn status_counts(&self) -> DomainResult<OrderStatusCounts> {
        async fn count_for(
            db: &DatabaseConnection,
            status: order::OrderStatus,
        ) -> DomainResult<u64> {
            order::Entity::find()
                .filter(order::Column::Status.eq(status))
                .count(db)
                .await
                .map_err(db_err)
        }

        Ok(OrderStatusCounts {
            pending: count_for(&self.db, order::OrderStatus::Pending).await?,
            preparing: count_for(&self.db, order::OrderStatus::Preparing).await?,
            ready: count_for(&self.db, order::OrderStatus::Ready).await?,
            completed: count_for(&self.db, order::OrderStatus::Completed).await?,
            cancelled: count_for(&self.db, order::OrderStatus::Cancelled).await?,
        })
    }

    async fn day_stats(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<DayOrderStats> {
        let orders = order::Entity::find()
            .filter(order::Column::CreatedAt.gte(start))
            .filter(order::Column::CreatedAt.lt(end))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let completed: Vec<_> = orders
            .iter()
            .filter(|o| o.status == order::OrderStatus::Completed)
            .collect();

        Ok(DayOrderStats {
            total_orders: orders.len() as u64,
            completed_orders: completed.len() as u64,
            revenue: completed.iter().map(|o| o.total_amount).sum(),
        })
    }
}
