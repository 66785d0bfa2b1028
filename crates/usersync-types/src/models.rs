/// Normalized profile fields — output of normalization, input to the upsert.
/// Website always carries a scheme (or is empty), company_name is never
/// absent (empty string when the upstream omits it).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub website: String,
    pub company_name: String,
}
