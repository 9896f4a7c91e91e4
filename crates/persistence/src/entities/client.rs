//! Client entity (database row mapping).

use chrono::NaiveDateTime;
use sqlx::FromRow;

use domain::models::Client;

/// Database row mapping for the clients table.
#[derive(Debug, Clone, FromRow)]
pub struct ClientEntity {
    pub id: i64,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub registered_at: NaiveDateTime,
    pub notes: String,
    pub active: bool,
}

impl From<ClientEntity> for Client {
    fn from(entity: ClientEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            phone: entity.phone,
            email: entity.email,
            registered_at: entity.registered_at,
            notes: entity.notes,
            active: entity.active,
        }
    }
}
