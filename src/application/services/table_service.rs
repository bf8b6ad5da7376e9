//! Table business logic

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::table::{CafeTable, TableStats, TableStatus};
use crate::domain::RepositoryProvider;
use crate::shared::{DomainError, DomainResult};

pub struct TableService {
    repos: Arc<dyn RepositoryProvider>,
}

impl TableService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    /// Customer scan of a table's QR code. An Available table is
    /// silently occupied; an already-Occupied table is returned as-is so
    /// re-scans at the same table keep working.
    pub async fn scan_qr(&self, qr_code: &str) -> DomainResult<CafeTable> {
        let mut table = self
            .repos
            .tables()
            .find_by_qr_code(qr_code)
            .await?
            .ok_or_else(|| DomainError::not_found("Table", "qr_code", qr_code))?;

        if table.status == TableStatus::Maintenance {
            return Err(DomainError::Conflict(format!(
                "table {} is under maintenance",
                table.table_number
            )));
        }

        if table.status == TableStatus::Available {
            table.occupy()?;
            self.repos
                .tables()
                .update_status(table.id, table.status)
                .await?;
            info!("Table {} occupied via QR scan", table.table_number);
        }

        Ok(table)
    }

    pub async fn list(&self, page: u64, limit: u64) -> DomainResult<(Vec<CafeTable>, u64)> {
        self.repos.tables().list_active(page, limit).await
    }

    pub async fn get(&self, id: i32) -> DomainResult<CafeTable> {
        self.repos
            .tables()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Table", "id", id))
    }

    pub async fn create(
        &self,
        table_number: String,
        seat_count: i32,
        location_description: Option<String>,
    ) -> DomainResult<CafeTable> {
        if seat_count < 1 {
            return Err(DomainError::Validation(
                "seat_count must be at least 1".into(),
            ));
        }
        if self
            .repos
            .tables()
            .exists_by_table_number(&table_number)
            .await?
        {
            return Err(DomainError::Conflict(format!(
                "table number {} already exists",
                table_number
            )));
        }

        let qr_code = self.generate_unique_qr_code().await?;
        let now = chrono::Utc::now();

        let table = CafeTable {
            id: 0,
            table_number,
            seat_count,
            qr_code,
            location_description,
            status: TableStatus::Available,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let saved = self.repos.tables().save(table).await?;
        info!(
            "Table {} created (qr: {})",
            saved.table_number, saved.qr_code
        );
        Ok(saved)
    }

    pub async fn update_info(
        &self,
        id: i32,
        table_number: String,
        seat_count: i32,
        location_description: Option<String>,
    ) -> DomainResult<CafeTable> {
        if seat_count < 1 {
            return Err(DomainError::Validation(
                "seat_count must be at least 1".into(),
            ));
        }

        let mut table = self.get(id).await?;

        // Duplicate check, ignoring the table's own number
        if table.table_number != table_number
            && self
                .repos
                .tables()
                .exists_by_table_number(&table_number)
                .await?
        {
            return Err(DomainError::Conflict(format!(
                "table number {} already exists",
                table_number
            )));
        }

        table.table_number = table_number;
        table.seat_count = seat_count;
        table.location_description = location_description;
        self.repos.tables().update(&table).await?;
        Ok(table)
    }

    /// Admin status override. Occupied is only reachable from Available;
    /// the other two states can always be forced.
    pub async fn set_status(&self, id: i32, status: TableStatus) -> DomainResult<CafeTable> {
        let mut table = self.get(id).await?;

        match status {
            TableStatus::Available => table.make_available(),
            TableStatus::Occupied => table.occupy()?,
            TableStatus::Maintenance => table.set_maintenance(),
        }

        self.repos.tables().update_status(id, table.status).await?;
        info!("Table {} status set to {}", table.table_number, status);
        Ok(table)
    }

    /// Soft delete; rejected while the table is occupied.
    pub async fn delete(&self, id: i32) -> DomainResult<()> {
        let mut table = self.get(id).await?;
        table.deactivate()?;
        self.repos.tables().update(&table).await?;
        info!("Table {} deleted", table.table_number);
        Ok(())
    }

    pub async fn regenerate_qr(&self, id: i32) -> DomainResult<CafeTable> {
        let mut table = self.get(id).await?;
        table.qr_code = self.generate_unique_qr_code().await?;
        self.repos.tables().update(&table).await?;
        info!("Table {} QR code regenerated", table.table_number);
        Ok(table)
    }

    pub async fn stats(&self) -> DomainResult<TableStats> {
        self.repos.tables().stats().await
    }

    /// Collision-check-and-retry loop against the store.
    async fn generate_unique_qr_code(&self) -> DomainResult<String> {
        loop {
            let token = Uuid::new_v4().simple().to_string()[..12].to_uppercase();
            let candidate = format!("TABLE_{token}");
            if !self.repos.tables().exists_by_qr_code(&candidate).await? {
                return Ok(candidate);
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::super::test_support::setup_repos;
    use super::*;

    async fn service() -> (TableService, Arc<dyn RepositoryProvider>) {
        let repos = setup_repos().await;
        (TableService::new(repos.clone()), repos)
    }

    #[tokio::test]
    async fn create_assigns_unique_qr_code() {
        let (svc, _) = service().await;
        let t1 = svc.create("T1".into(), 4, None).await.unwrap();
        let t2 = svc.create("T2".into(), 2, Some("terrace".into())).await.unwrap();

        assert!(t1.qr_code.starts_with("TABLE_"));
        assert_eq!(t1.qr_code.len(), "TABLE_".len() + 12);
        assert_ne!(t1.qr_code, t2.qr_code);
        assert_eq!(t1.status, TableStatus::Available);
    }

    #[tokio::test]
    async fn duplicate_table_number_is_rejected() {
        let (svc, _) = service().await;
        svc.create("T1".into(), 4, None).await.unwrap();
        let err = svc.create("T1".into(), 2, None).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn scan_occupies_available_table() {
        let (svc, repos) = service().await;
        let t = svc.create("T1".into(), 4, None).await.unwrap();

        let scanned = svc.scan_qr(&t.qr_code).await.unwrap();
        assert_eq!(scanned.status, TableStatus::Occupied);

        let stored = repos.tables().find_by_id(t.id).await.unwrap().unwrap();
        assert_eq!(stored.status, TableStatus::Occupied);
    }

    #[tokio::test]
    async fn rescan_of_occupied_table_is_idempotent() {
        let (svc, _) = service().await;
        let t = svc.create("T1".into(), 4, None).await.unwrap();
        svc.scan_qr(&t.qr_code).await.unwrap();

        let again = svc.scan_qr(&t.qr_code).await.unwrap();
        assert_eq!(again.status, TableStatus::Occupied);
    }

    #[tokio::test]
    async fn scan_of_maintenance_table_conflicts() {
        let (svc, _) = service().await;
        let t = svc.create("T1".into(), 4, None).await.unwrap();
        svc.set_status(t.id, TableStatus::Maintenance).await.unwrap();

        let err = svc.scan_qr(&t.qr_code).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn scan_of_unknown_code_is_not_found() {
        let (svc, _) = service().await;
        let err = svc.scan_qr("TABLE_DOESNOTEXIST").await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }

    #[tokio::test]
    async fn delete_occupied_table_conflicts() {
        let (svc, _) = service().await;
        let t = svc.create("T1".into(), 4, None).await.unwrap();
        svc.scan_qr(&t.qr_code).await.unwrap();

        let err = svc.delete(t.id).await.unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn deleted_table_disappears_from_lookups() {
        let (svc, _) = service().await;
        let t = svc.create("T1".into(), 4, None).await.unwrap();
        svc.delete(t.id).await.unwrap();

        assert!(matches!(
            svc.get(t.id).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        assert!(matches!(
            svc.scan_qr(&t.qr_code).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
    }

    #[tokio::test]
    async fn stats_count_by_status() {
        let (svc, _) = service().await;
        let t1 = svc.create("T1".into(), 4, None).await.unwrap();
        svc.create("T2".into(), 2, None).await.unwrap();
        let t3 = svc.create("T3".into(), 6, None).await.unwrap();

        svc.scan_qr(&t1.qr_code).await.unwrap();
        svc.set_status(t3.id, TableStatus::Maintenance).await.unwrap();

        let stats = svc.stats().await.unwrap();
        assert_eq!(stats.total, 3);
        assert_eq!(stats.available, 1);
        assert_eq!(stats.occupied, 1);
        assert_eq!(stats.maintenance, 1);
        assert_eq!(stats.total_seats, 12);
    }

    #[tokio::test]
    async fn regenerate_qr_invalidates_old_code() {
        let (svc, _) = service().await;
        let t = svc.create("T1".into(), 4, None).await.unwrap();
        let old_code = t.qr_code.clone();

        let updated = svc.regenerate_qr(t.id).await.unwrap();
        assert_ne!(updated.qr_code, old_code);
        assert!(matches!(
            svc.scan_qr(&old_code).await.unwrap_err(),
            DomainError::NotFound { .. }
        ));
        svc.scan_qr(&updated.qr_code).await.unwrap();
    }
}
