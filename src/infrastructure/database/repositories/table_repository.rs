//! SeaORM implementation of TableRepository

use async_trait::async_trait;
use chrono::Utc;
use log::info;
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};

use super::db_err;
use crate::domain::table::{CafeTable, TableRepository, TableStats, TableStatus};
use crate::infrastructure::database::entities::table;
use crate::shared::{DomainError, DomainResult};

// ── Conversion helpers ──────────────────────────────────────────

fn entity_to_domain(t: table::Model) -> CafeTable {
    CafeTable {
        id: t.id,
        table_number: t.table_number,
        seat_count: t.seat_count,
        qr_code: t.qr_code,
        location_description: t.location_description,
        status: match t.status {
            table::TableStatus::Available => TableStatus::Available,
            table::TableStatus::Occupied => TableStatus::Occupied,
            table::TableStatus::Maintenance => TableStatus::Maintenance,
        },
        is_active: t.is_active,
        created_at: t.created_at,
        updated_at: t.updated_at,
    }
}

pub(crate) fn status_to_entity(s: TableStatus) -> table::TableStatus {
    match s {
        TableStatus::Available => table::TableStatus::Available,
        TableStatus::Occupied => table::TableStatus::Occupied,
        TableStatus::Maintenance => table::TableStatus::Maintenance,
    }
}

// ── SeaOrmTableRepository ───────────────────────────────────────

pub struct SeaOrmTableRepository {
    db: DatabaseConnection,
}

impl SeaOrmTableRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TableRepository for SeaOrmTableRepository {
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<CafeTable>> {
        let model = table::Entity::find_by_id(id)
            .filter(table::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn find_by_qr_code(&self, qr_code: &str) -> DomainResult<Option<CafeTable>> {
        let model = table::Entity::find()
            .filter(table::Column::QrCode.eq(qr_code))
            .filter(table::Column::IsActive.eq(true))
            .one(&self.db)
            .await
            .map_err(db_err)?;
        Ok(model.map(entity_to_domain))
    }

    async fn exists_by_table_number(&self, table_number: &str) -> DomainResult<bool> {
        let count = table::Entity::find()
            .filter(table::Column::TableNumber.eq(table_number))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn exists_by_qr_code(&self, qr_code: &str) -> DomainResult<bool> {
        let count = table::Entity::find()
            .filter(table::Column::QrCode.eq(qr_code))
            .count(&self.db)
            .await
            .map_err(db_err)?;
        Ok(count > 0)
    }

    async fn list_active(&self, page: u64, limit: u64) -> DomainResult<(Vec<CafeTable>, u64)> {
        let paginator = table::Entity::find()
            .filter(table::Column::IsActive.eq(true))
            .order_by_asc(table::Column::TableNumber)
            .paginate(&self.db, limit);

        let total = paginator.num_items().await.map_err(db_err)?;
        let models = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_err)?;
        Ok((models.into_iter().map(entity_to_domain).collect(), total))
    }

    async fn save(&self, t: CafeTable) -> DomainResult<CafeTable> {
        let now = Utc::now();
        let model = table::ActiveModel {
            id: ActiveValue::NotSet,
            table_number: Set(t.table_number),
            seat_count: Set(t.seat_count),
            qr_code: Set(t.qr_code),
            location_description: Set(t.location_description),
            status: Set(status_to_entity(t.status)),
            is_active: Set(t.is_active),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let result = model.insert(&self.db).await.map_err(db_err)?;
        info!("Table saved: {} ({})", result.table_number, result.id);
        Ok(entity_to_domain(result))
    }

    async fn update(&self, t: &CafeTable) -> DomainResult<()> {
        let existing = table::Entity::find_by_id(t.id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("Table", "id", t.id));
        };

        let model = table::ActiveModel {
            id: Set(t.id),
            table_number: Set(t.table_number.clone()),
            seat_count: Set(t.seat_count),
            qr_code: Set(t.qr_code.clone()),
            location_description: Set(t.location_description.clone()),
            status: Set(status_to_entity(t.status)),
            is_active: Set(t.is_active),
            created_at: Set(existing.created_at),
            updated_at: Set(Utc::now()),
        };
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn update_status(&self, id: i32, status: TableStatus) -> DomainResult<()> {
        let existing = table::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .map_err(db_err)?;

        let Some(existing) = existing else {
            return Err(DomainError::not_found("Table", "id", id));
        };

        let mut model: table::ActiveModel = existing.into();
        model.status = Set(status_to_entity(status));
        model.updated_at = Set(Utc::now());
        model.update(&self.db).await.map_err(db_err)?;
        Ok(())
    }

    async fn stats(&self) -> DomainResult<TableStats> {
        let tables = table::Entity::find()
            .filter(table::Column::IsActive.eq(true))
            .all(&self.db)
            .await
            .map_err(db_err)?;

        let mut stats = TableStats {
            total: tables.len() as u64,
            available: 0,
            occupied: 0,
            maintenance: 0,
            total_seats: 0,
        };
        for t in &tables {
            stats.total_seats += t.seat_count as i64;
            match t.status {
                table::TableStatus::Available => stats.available += 1,
                table::TableStatus::Occupied => stats.occupied += 1,
                table::TableStatus::Maintenance => stats.maintenance += 1,
            }
        }
        Ok(stats)
    }
}
