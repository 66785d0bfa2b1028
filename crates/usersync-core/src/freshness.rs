use chrono::{DateTime, Duration, Utc};

/// Whether a cached record must be refetched.
///
/// A missing record is always stale. Otherwise a record is stale iff its
/// age strictly exceeds the TTL — a record exactly at the boundary is
/// still fresh. Pure function of its inputs; the caller supplies `now`.
pub fn is_stale(last_updated: Option<DateTime<Utc>>, now: DateTime<Utc>, ttl: Duration) -> bool {
    match last_updated {
        None => true,
        Some(t) => now - t > ttl,
    }
}
