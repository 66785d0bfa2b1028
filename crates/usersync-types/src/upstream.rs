use serde::Deserialize;

/// Raw payload shape returned by the upstream profile API.
/// Lives for one fetch → normalize → upsert cycle and is never persisted.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamUser {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    /// May arrive without a scheme ("example.com") or empty.
    #[serde(default)]
    pub website: String,
    #[serde(default)]
    pub company: Option<UpstreamCompany>,
}

/// Nested company object from the upstream payload. Only the name is kept;
/// the upstream sends more fields and serde drops them.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamCompany {
    #[serde(default)]
    pub name: Option<String>,
}
