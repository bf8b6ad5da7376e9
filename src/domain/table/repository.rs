//! Table repository interface

use async_trait::async_trait;

use super::model::{CafeTable, TableStats, TableStatus};
use crate::shared::DomainResult;

#[async_trait]
pub trait TableRepository: Send + Sync {
    /// Find an active table by id. Soft-deleted tables are not returned.
    async fn find_by_id(&self, id: i32) -> DomainResult<Option<CafeTable>>;
    /// Find an active table by its QR code token.
    async fn find_by_qr_code(&self, qr_code: &str) -> DomainResult<Option<CafeTable>>;
    async fn exists_by_table_number(&self, table_number: &str) -> DomainResult<bool>;
    async fn exists_by_qr_code(&self, qr_code: &str) -> DomainResult<bool>;
    /// Active tables, paginated. Returns (page items, total count).
    async fn list_active(&self, page: u64, limit: u64) -> DomainResult<(Vec<CafeTable>, u64)>;
    async fn save(&self, table: CafeTable) -> DomainResult<CafeTable>;
    async fn update(&self, table: &CafeTable) -> DomainResult<()>;
    /// Persist a bare status change.
    async fn update_status(&self, id: i32, status: TableStatus) -> DomainResult<()>;
    async fn stats(&self) -> DomainResult<TableStats>;
}
