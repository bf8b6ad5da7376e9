//! Café table domain entity

use chrono::{DateTime, Utc};

use crate::shared::{DomainError, DomainResult};

/// Occupancy state of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableStatus {
    Available,
    Occupied,
    Maintenance,
}

impl TableStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Occupied => "OCCUPIED",
            Self::Maintenance => "MAINTENANCE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "AVAILABLE" => Some(Self::Available),
            "OCCUPIED" => Some(Self::Occupied),
            "MAINTENANCE" => Some(Self::Maintenance),
            _ => None,
        }
    }
}

impl std::fmt::Display for TableStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Physical seating unit, identified towards customers by its QR code.
///
/// Soft-deleted tables keep their rows but have `is_active = false`;
/// every lookup path treats them as missing.
#[derive(Debug, Clone)]
pub struct CafeTable {
    pub id: i32,
    /// Human-facing table number, unique across active tables
    pub table_number: String,
    pub seat_count: i32,
    /// Opaque token printed on the table's QR code, unique
    pub qr_code: String,
    pub location_description: Option<String>,
    pub status: TableStatus,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CafeTable {
    /// Mark the table as taken. Only an Available table can be occupied.
    pub fn occupy(&mut self) -> DomainResult<()> {
        if self.status != TableStatus::Available {
            return Err(DomainError::InvalidState(format!(
                "table {} cannot be occupied from {}",
                self.table_number, self.status
            )));
        }
        self.status = TableStatus::Occupied;
        Ok(())
    }

    /// Release the table, whatever state it was in. Used both by admin
    /// reset and automatically when an order completes.
    pub fn make_available(&mut self) {
        self.status = TableStatus::Available;
    }

    pub fn set_maintenance(&mut self) {
        self.status = TableStatus::Maintenance;
    }

    /// Soft delete. An occupied table cannot be removed.
    pub fn deactivate(&mut self) -> DomainResult<()> {
        if self.status == TableStatus::Occupied {
            return Err(DomainError::Conflict(format!(
                "table {} is occupied and cannot be deleted",
                self.table_number
            )));
        }
        self.is_active = false;
        Ok(())
    }

    pub fn is_available(&self) -> bool {
        self.is_active && self.status == TableStatus::Available
    }

    pub fn is_occupied(&self) -> bool {
        self.status == TableStatus::Occupied
    }
}

/// Occupancy statistics for the admin dashboard
#[derive(Debug, Clone)]
pub struct TableStats {
    pub total: u64,
    pub available: u64,
    pub occupied: u64,
    pub maintenance: u64,
    pub total_seats: i64,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> CafeTable {
        CafeTable {
            id: 1,
            table_number: "T1".into(),
            seat_count: 4,
            qr_code: "TABLE_AB12CD34EF56".into(),
            location_description: Some("window side".into()),
            status: TableStatus::Available,
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn occupy_from_available() {
        let mut t = sample_table();
        t.occupy().unwrap();
        assert_eq!(t.status, TableStatus::Occupied);
        assert!(t.is_occupied());
    }

    #[test]
    fn occupy_from_occupied_fails() {
        let mut t = sample_table();
        t.status = TableStatus::Occupied;
        let err = t.occupy().unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
        assert_eq!(t.status, TableStatus::Occupied);
    }

    #[test]
    fn occupy_from_maintenance_fails() {
        let mut t = sample_table();
        t.status = TableStatus::Maintenance;
        assert!(t.occupy().is_err());
        assert_eq!(t.status, TableStatus::Maintenance);
    }

    #[test]
    fn make_available_is_unconditional() {
        let mut t = sample_table();
        t.status = TableStatus::Maintenance;
        t.make_available();
        assert_eq!(t.status, TableStatus::Available);

        t.status = TableStatus::Occupied;
        t.make_available();
        assert_eq!(t.status, TableStatus::Available);
    }

    #[test]
    fn set_maintenance_is_unconditional() {
        let mut t = sample_table();
        t.status = TableStatus::Occupied;
        t.set_maintenance();
        assert_eq!(t.status, TableStatus::Maintenance);
    }

    #[test]
    fn deactivate_occupied_fails() {
        let mut t = sample_table();
        t.status = TableStatus::Occupied;
        let err = t.deactivate().unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
        assert!(t.is_active);
    }

    #[test]
    fn deactivate_available_succeeds() {
        let mut t = sample_table();
        t.deactivate().unwrap();
        assert!(!t.is_active);
        assert!(!t.is_available());
    }

    #[test]
    fn status_roundtrip() {
        for s in [
            TableStatus::Available,
            TableStatus::Occupied,
            TableStatus::Maintenance,
        ] {
            assert_eq!(TableStatus::parse(s.as_str()), Some(s));
        }
        assert_eq!(TableStatus::parse("UNKNOWN"), None);
    }
}
