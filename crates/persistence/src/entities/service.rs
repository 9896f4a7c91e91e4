//! Service entity (database row mapping).

use sqlx::FromRow;

use domain::models::Service;

/// Database row mapping for the services table.
#[derive(Debug, Clone, FromRow)]
pub struct ServiceEntity {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub duration_minutes: i32,
    pub active: bool,
}

impl From<ServiceEntity> for Service {
    fn from(entity: ServiceEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            description: entity.description,
            price: entity.price,
            duration_minutes: entity.duration_minutes,
            active: entity.active,
        }
    }
}
