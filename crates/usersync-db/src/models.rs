use chrono::{DateTime, Utc};
use usersync_types::api::UserView;

/// Database row type — maps directly to the users table.
/// Distinct from the usersync-types API models to keep the DB layer
/// independent of the wire format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub website: String,
    pub company_name: String,
    pub updated_at: DateTime<Utc>,
}

impl UserRow {
    /// Outbound view: drops the internal id and cache timestamp.
    pub fn to_view(&self) -> UserView {
        UserView {
            name: self.name.clone(),
            username: self.username.clone(),
            email: self.email.clone(),
            website: self.website.clone(),
            company_name: self.company_name.clone(),
        }
    }
}
