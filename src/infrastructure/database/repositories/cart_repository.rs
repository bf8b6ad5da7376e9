//! SeaORM implementation of CartRepository
//!
//! The merge-or-append and clear operations are multi-row; each runs in
//! a database transaction so concurrent requests against the same table
//! cannot interleave them (two simultaneous adds of the same menu must
//! collapse into one line, never two).

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use log::{debug, info};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use super::{db_err, tx_err};
use crate::domain::cart::{Cart, CartItem, CartRepository};
use crate::domain::menu::Menu;
use crate::infrastructure::database::entities::{cart, cart_item, menu};
use crate::shared::{DomainError, DomainResult};

pub struct SeaOrmCartRepository {
    db: DatabaseConnection,
}

impl SeaOrmCartRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Load a cart with its items and the menu names joined in.
    async fn load_cart(&self, cart_row: cart::Model) -> DomainResult<Cart> {
        let items = cart_item::Entity::find()
            .filter(cart_item::Column::CartId.eq(cart_row.id))
            .order_by_asc(cart_item::Column::Id)
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let menu_ids: Vec<i32> = items.iter().map(|i| i.menu_id).collect();
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

        Ok(Cart {
            id: cart_row.id,
            table_id: cart_row.table_id,
            items: items
                .into_iter()
                .map(|i| CartItem {
                    id: i.id,
                    cart_id: i.cart_id,
                    menu_id: i.menu_id,
                    menu_name: menu_names.get(&i.menu_id).cloned().unwrap_or_default(),
                    quantity: i.quantity,
                    unit_price: i.unit_price,
                    notes: i.notes,
                })
                .collect(),
            created_at: cart_row.created_at,
            updated_at: cart_row.updated_at,
        })
    }

    async fn reload_by_table(&self, table_id: i32) -> DomainResult<Cart> {
        let row = cart::Entity::find()
            .filter(cart::Column::TableId.eq(table_id))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Cart", "table_id", table_id))?;
        self.load_cart(row).await
    }
}

/// Find the cart row of a table inside a transaction.
async fn cart_row_for_table(
    txn: &DatabaseTransaction,
    table_id: i32,
) -> DomainResult<Option<cart::Model>> {
    cart::Entity::find()
        .filter(cart::Column::TableId.eq(table_id))
        .one(txn)
        .await
        .map_err(db_err)
}

#[async_trait]
impl CartRepository for SeaOrmCartRepository {
    async fn find_by_table(&self, table_id: i32) -> DomainResult<Option<Cart>> {
        let row = cart::Entity::find()
            .filter(cart::Column::TableId.eq(table_id))
            .one(&self.db)
            .await
            .map_err(db_err)?;

        match row {
            Some(row) => Ok(Some(self.load_cart(row).await?)),
            None => Ok(None),
        }
    }

    async fn add_item(
        &self,
        table_id: i32,
        menu: &Menu,
        quantity: i32,
        notes: Option<String>,
    ) -> DomainResult<Cart> {
        let menu_id = menu.id;
        let unit_price = menu.price;

        self.db
            .transaction::<_, (), DomainError>(move |txn| {
                Box::pin(async move {
                    let now = Utc::now();

                    // Lazily create the cart on first add
                    let cart_id = match cart_row_for_table(txn, table_id).await? {
                        Some(row) => row.id,
                        None => {
                            let row = cart::ActiveModel {
                                id: ActiveValue::NotSet,
                                table_id: Set(table_id),
                                created_at: Set(now),
                                updated_at: Set(now),
                            };
                            let created = row.insert(txn).await.map_err(db_err)?;
                            debug!("Cart created for table {}", table_id);
                            created.id
                        }
                    };

                    // Merge into an existing line for the same menu
                    let existing = cart_item::Entity::find()
                        .filter(cart_item::Column::CartId.eq(cart_id))
                        .filter(cart_item::Column::MenuId.eq(menu_id))
                        .one(txn)
                        .await
                        .map_err(db_err)?;

                    match existing {
                        Some(line) => {
                            let new_quantity = line.quantity + quantity;
                            let unit_price = line.unit_price;
                            let mut model: cart_item::ActiveModel = line.into();
                            model.quantity = Set(new_quantity);
                            model.subtotal = Set(unit_price * Decimal::from(new_quantity));
                            model.updated_at = Set(now);
                            model.update(txn).await.map_err(db_err)?;
                        }
                        None => {
                            let model = cart_item::ActiveModel {
                                id: ActiveValue::NotSet,
                                cart_id: Set(cart_id),
                                menu_id: Set(menu_id),
                                quantity: Set(quantity),
                                unit_price: Set(unit_price),
                                subtotal: Set(unit_price * Decimal::from(quantity)),
                                notes: Set(notes),
                                created_at: Set(now),
                                updated_at: Set(now),
                            };
                            model.insert(txn).await.map_err(db_err)?;
                        }
                    }
                    Ok(())
                })
            })
            .await
            .map_err(tx_err)?;

        self.reload_by_table(table_id).await
    }

    async fn update_item_quantity(
        &self,
        table_id: i32,
        item_id: i32,
        quantity: i32,
    ) -> DomainResult<Cart> {
        self.db
            .transaction::<_, (), DomainError>(move |txn| {
                Box::pin(async move {
                    let cart_row = cart_row_for_table(txn, table_id)
                        .await?
                        .ok_or_else(|| DomainError::not_found("Cart", "table_id", table_id))?;

                    let line = cart_item::Entity::find_by_id(item_id)
                        .filter(cart_item::Column::CartId.eq(cart_row.id))
                        .one(txn)
                        .await
                        .map_err(db_err)?
                        .ok_or_else(|| DomainError::not_found("CartItem", "id", item_id))?;

                    let unit_price = line.unit_price;
                    let mut model: cart_item::ActiveModel = line.into();
                    model.quantity = Set(quantity);
                    model.subtotal = Set(unit_price * Decimal::from(quantity));
                    model.updated_at = Set(Utc::now());
                    model.update(txn).await.map_err(db_err)?;
                    Ok(())
                })
            })
            .await
            .map_err(tx_err)?;

        self.reload_by_table(table_id).await
    }

    async fn remove_item(&self, table_id: i32, item_id: i32) -> DomainResult<Cart> {
        let cart_row = cart::Entity::find()
            .filter(cart::Column::TableId.eq(table_id))
            .one(&self.db)
            .await
            .map_err(db_err)?
            .ok_or_else(|| DomainError::not_found("Cart", "table_id", table_id))?;

        let result = cart_item::Entity::delete_many()
            .filter(cart_item::Column::Id.eq(item_id))
            .filter(cart_item::Column::CartId.eq(cart_row.id))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        if result.rows_affected == 0 {
            return Err(DomainError::not_found("CartItem", "id", item_id));
        }

        self.reload_by_table(table_id).await
    }

    async fn clear(&self, table_id: i32) -> DomainResult<()> {
        self.db
            .transaction::<_, (), DomainError>(move |txn| {
                Box::pin(async move {
                    let Some(cart_row) = cart_row_for_table(txn, table_id).await? else {
                        return Ok(());
                    };

                    cart_item::Entity::delete_many()
                        .filter(cart_item::Column::CartId.eq(cart_row.id))
                        .exec(txn)
                        .await
                        .map_err(db_err)?;
                    cart::Entity::delete_by_id(cart_row.id)
                        .exec(txn)
                        .await
                        .map_err(db_err)?;

                    info!("Cart cleared for table {}", table_id);
                    Ok(())
                })
            })
            .await
            .map_err(tx_err)
    }

    async fn sweep_empty(&self) -> DomainResult<u64> {
        // Single statement so a cart that gains an item concurrently is
        // never caught by the sweep.
        let occupied_carts = Query::select()
            .column(cart_item::Column::CartId)
            .from(cart_item::Entity)
            .to_owned();

        let result = cart::Entity::delete_many()
            .filter(Expr::col((cart::Entity, cart::Column::Id)).not_in_subquery(occupied_carts))
            .exec(&self.db)
            .await
            .map_err(db_err)?;

        Ok(result.rows_affected)
    }
}
