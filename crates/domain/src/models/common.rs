//! Request and response shapes shared by every catalog entity.

use serde::{Deserialize, Serialize};

/// Query parameters for listing clients, employees or services.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    /// Include soft-deleted records.
    #[serde(default)]
    pub include_inactive: bool,

    /// Case-insensitive substring match on name, phone or email.
    pub search: Option<String>,
}

impl ListQuery {
    /// Returns the trimmed search term, if any.
    pub fn search_term(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Response for bulk upserts. `ids` follow the order of the request entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkSaveResponse {
    pub success: bool,
    pub ids: Vec<i64>,
}

impl BulkSaveResponse {
    pub fn saved(ids: Vec<i64>) -> Self {
        Self { success: true, ids }
    }
}

/// Response for deletes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

pub(crate) fn default_active() -> bool {
    true
}
