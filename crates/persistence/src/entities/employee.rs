//! Employee entity (database row mapping).

use chrono::NaiveDateTime;
use sqlx::FromRow;

use domain::models::Employee;

/// Database row mapping for the employees table.
#[derive(Debug, Clone, FromRow)]
pub struct EmployeeEntity {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub role: String,
    pub hired_at: NaiveDateTime,
    pub salary: f64,
    pub active: bool,
}

impl From<EmployeeEntity> for Employee {
    fn from(entity: EmployeeEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            phone: entity.phone,
            email: entity.email,
            role: entity.role,
            hired_at: entity.hired_at,
            salary: entity.salary,
            active: entity.active,
        }
    }
}
