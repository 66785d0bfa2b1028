pub mod error;
pub mod freshness;
pub mod normalize;
pub mod service;
pub mod upstream;

pub use error::SyncError;
pub use service::UserService;
pub use upstream::{HttpUpstream, UpstreamFetch};
