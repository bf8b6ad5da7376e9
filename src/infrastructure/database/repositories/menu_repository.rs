//! SeaORM implementation of MenuRepository

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::db_err;
use crate::domain::menu::{Menu, MenuFilter, MenuOption, MenuRepository};
use crate::infrastructure::database::entities::{menu, menu_option};
use crate::shared::{DomainError, DomainResult};

// ── Conversion helpers ──────────────────────────────────────────

fn entity_to_domain(m: menu::Model) -> Menu {
    Menu {
        id: m.id,
        name: m.name,
        description: m.description,
        price: m.price,
        category: m.category,
        image_url: m.image_url,
        is_available: m.is_available,
        stock_quantity: m.stock_quantity,
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn option_to_domain(o: menu_option::Model) -> MenuOption {
    MenuOption {
        id: o.id,
        menu_id: o.menu_id,
        name: o.name,
        extra_price: o.extra_price,
        is_available: o.is_available,
        created_at: o.created_at,
        updated_at: o.updated_at,
    }
}

// ── SeaOrmMenuRepository ────────────────────────────────────────

pub struct SeaOrmMenuRepository {
    db: DatabaseConnection,
}

impl SeaOrmMenuRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MenuRepository for SeaOrmMenuRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<Menu>> {
        let model = menu::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn list_available(&self, filter: &MenuFilter) -> DomainResult<Vec<Menu>> {
        let mut query = menu::Entity::find().filter(menu::Column::IsAvailable.eq(true));

        if let Some(category) = &filter.category {
            query = query.filter(menu::Column::Category.eq(category));
        }
        if let Some(search) = &filter.search {
            query = query.filter(menu::Column::Name.contains(search));
        }

        let models = query
            .order_by_asc(menu::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(entity_to_domain).collect())
    }

    async fn list_all(&self, page: u64, limit: u64) -> DomainResult<(Vec<Menu>, u64)> {
        let paginator = menu::Entity::find()
            .order_by_asc(menu::Column::Name)
            .paginate(&self.db, limit);

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_err)?;
        Ok((models.into_iter().map(entity_to_domain).collect(), total))
    }

    async fn save(&self, m: Menu) -> DomainResult<Menu> {
        let now = Utc::now();
        let model = menu::ActiveModel {
            id: ActiveValue::NotSet,
            name: Set(m.name),
            description: Set(m.description),
            price: Set(m.price),
            category: Set(m.category),
            image_url: Set(m.image_url),
            is_available: Set(m.is_available),
            stock_quantity: Set(m.stock_quantity),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let result = model.insert(&self.db).await.map_err(db_err)?;
        info!("Menu saved: {} ({})", result.name, result.id);
        Ok(entity_to_domain(result))
    }

    async fn update(&self, m: &Menu) -> DomainResult<()> {
        let existing = menu::Entity::find_by_id(m.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("Menu", "id", m.id));
        };

        let model = menu::ActiveModel {
            id: Set(m.id),
            name: Set(m.name.clone()),
            description: Set(m.description.clone()),
            price: Set(m.price),
            category: Set(m.category.clone()),
            image_url: Set(m.image_url.clone()),
            is_available: Set(m.is_available),
            stock_quantity: Set(m.stock_quantity),
            created_at: Set(existing.created_at),
            updated_at: Set(Utc::now()),
        };
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete(&self, id: i32) -> DomainResult<()> {
        let result = menu::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Menu", "id", id));
        }
        info!("Menu deleted: {}", id);
        Ok(())
    }

    async fn find_options(&self, menu_id: i32) -> DomainResult<Vec<MenuOption>> {
        let models = menu_option::Entity::find()
            .filter(menu_option::Column::MenuId.eq(menu_id))
            .order_by_asc(menu_option::Column::Name)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(models.into_iter().map(option_to_domain).collect())
    }

    async fn find_option_by_id(&self, option_id: i32) -> DomainResult<Option<MenuOption>> {
        let model = menu_option::Entity::find_by_id(option_id)
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(option_to_domain))
    }

    async fn save_option(&self, o: MenuOption) -> DomainResult<MenuOption> {
        let now = Utc::now();
        let model = menu_option::ActiveModel {
            id: ActiveValue::NotSet,
            menu_id: Set(o.menu_id),
            name: Set(o.name),
            extra_price: Set(o.extra_price),
            is_available: Set(o.is_available),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let result = model.insert(&self.db).await.map_err(db_err)?;
        Ok(option_to_domain(result))
    }

    async fn update_option(&self, o: &MenuOption) -> DomainResult<()> {
        let existing = menu_option::Entity::find_by_id(o.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("MenuOption", "id", o.id));
        };

        let model = menu_option::ActiveModel {
            id: Set(o.id),
            menu_id: Set(o.menu_id),
            name: Set(o.name.clone()),
            extra_price: Set(o.extra_price),
            is_available: Set(o.is_available),
            created_at: Set(existing.created_at),
            updated_at: Set(Utc::now()),
        };
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete_option(&self, option_id: i32) -> DomainResult<()> {
        let result = menu_option::Entity::delete_by_id(option_id)
            .exec(&self.db)
            .await
            .map_err(db_err)?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("MenuOption", "id", option_id));
        }
        Ok(())
    }
}
