use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// -- Read / refresh --

/// Flattened, normalized view exposed to callers. Never includes the
/// internal row id or the cache timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    pub name: String,
    pub username: String,
    pub email: String,
    pub website: String,
    #[serde(rename = "companyName")]
    pub company_name: String,
}

// -- Diagnostics --

#[derive(Debug, Serialize)]
pub struct CountResponse {
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct StaleUserEntry {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct StaleUsersResponse {
    pub stale_users: Vec<StaleUserEntry>,
}
