use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::debug;

use usersync_db::Database;
use usersync_db::models::UserRow;
use usersync_types::api::UserView;

use crate::error::SyncError;
use crate::freshness::is_stale;
use crate::normalize::normalize;
use crate::upstream::UpstreamFetch;

/// Read-through cache orchestration: decide hit vs miss, and on a miss run
/// the fetch → normalize → upsert cycle. All dependencies are injected;
/// there is no ambient connection or clock beyond `Utc::now()` at the
/// decision point.
pub struct UserService {
    db: Arc<Database>,
    upstream: Arc<dyn UpstreamFetch>,
    ttl: Duration,
}

impl UserService {
    pub fn new(db: Arc<Database>, upstream: Arc<dyn UpstreamFetch>, ttl: Duration) -> Self {
        Self { db, upstream, ttl }
    }

    /// Read path. Serves the stored row iff it exists, is fresh, and no
    /// bypass was requested; any of the three misses forces a refetch.
    pub async fn get_user(&self, id: i64, bypass_cache: bool) -> Result<UserView, SyncError> {
        let row = self.load_row(id).await?;
        let now = Utc::now();

        if !bypass_cache {
            if let Some(row) = &row {
                if !is_stale(Some(row.updated_at), now, self.ttl) {
                    debug!(id, "cache hit");
                    return Ok(row.to_view());
                }
            }
        }

        debug!(id, bypass_cache, "cache miss, fetching upstream");
        let row = self.fetch_and_store().await?;
        Ok(row.to_view())
    }

    /// Refresh path: unconditional fetch → normalize → upsert, no
    /// freshness check and no pre-existing-record requirement.
    pub async fn refresh_user(&self) -> Result<UserView, SyncError> {
        let row = self.fetch_and_store().await?;
        Ok(row.to_view())
    }

    async fn load_row(&self, id: i64) -> Result<Option<UserRow>, SyncError> {
        let db = self.db.clone();
        tokio::task::spawn_blocking(move || db.get_user(id))
            .await
            .map_err(|e| SyncError::Task(e.to_string()))?
            .map_err(SyncError::from)
    }

    /// No DB lock is held across the upstream await; the fetch completes
    /// before any write begins, so a failed fetch leaves the row untouched.
    async fn fetch_and_store(&self) -> Result<UserRow, SyncError> {
        let raw = self.upstream.fetch().await?;
        let profile = normalize(raw);
        let now = Utc::now();

        let db = self.db.clone();
        tokio::task::spawn_blocking(move || db.upsert_user(&profile, now))
            .await
            .map_err(|e| SyncError::Task(e.to_string()))?
            .map_err(SyncError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use usersync_types::models::UserProfile;
    use usersync_types::upstream::{UpstreamCompany, UpstreamUser};

    struct MockUpstream {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl UpstreamFetch for MockUpstream {
        async fn fetch(&self) -> Result<UpstreamUser, SyncError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SyncError::UpstreamUnavailable("mock outage".into()));
            }
            Ok(UpstreamUser {
                id: 1,
                name: "Leanne Graham".into(),
                username: "bret".into(),
                email: "leanne@example.com".into(),
                website: "hildegard.org".into(),
                company: Some(UpstreamCompany {
                    name: Some("Romaguera-Crona".into()),
                }),
            })
        }
    }

    fn service(db: &Arc<Database>, fail: bool) -> (UserService, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let upstream = Arc::new(MockUpstream {
            calls: calls.clone(),
            fail,
        });
        let svc = UserService::new(db.clone(), upstream, Duration::minutes(10));
        (svc, calls)
    }

    fn seed_row(db: &Database, age: Duration) {
        let profile = UserProfile {
            id: 1,
            name: "Leanne Graham".into(),
            username: "bret".into(),
            email: "leanne@example.com".into(),
            website: "https://hildegard.org".into(),
            company_name: "Romaguera-Crona".into(),
        };
        db.upsert_user(&profile, Utc::now() - age).unwrap();
    }

    #[tokio::test]
    async fn empty_store_triggers_fetch_and_persists() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let (svc, calls) = service(&db, false);

        let view = svc.get_user(1, false).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(view.website, "https://hildegard.org");
        assert_eq!(view.company_name, "Romaguera-Crona");

        let row = db.get_user(1).unwrap().expect("row persisted");
        assert!(Utc::now() - row.updated_at < Duration::seconds(5));
    }

    #[tokio::test]
    async fn fresh_row_serves_from_cache() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        seed_row(&db, Duration::minutes(1));
        let (svc, calls) = service(&db, false);

        let view = svc.get_user(1, false).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0, "no fetch on cache hit");
        assert_eq!(view.username, "bret");
    }

    #[tokio::test]
    async fn bypass_forces_fetch_even_when_fresh() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        seed_row(&db, Duration::minutes(1));
        let (svc, calls) = service(&db, false);

        svc.get_user(1, true).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn stale_row_triggers_refetch() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        seed_row(&db, Duration::minutes(11));
        let before = db.get_user(1).unwrap().unwrap().updated_at;
        let (svc, calls) = service(&db, false);

        svc.get_user(1, false).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let after = db.get_user(1).unwrap().unwrap().updated_at;
        assert!(after > before, "refresh must advance the timestamp");
    }

    #[tokio::test]
    async fn refresh_always_fetches() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        seed_row(&db, Duration::minutes(1));
        let (svc, calls) = service(&db, false);

        svc.refresh_user().await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn upstream_failure_leaves_store_untouched() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        let (svc, _calls) = service(&db, true);

        let err = svc.get_user(1, false).await.unwrap_err();
        assert!(matches!(err, SyncError::UpstreamUnavailable(_)));
        assert_eq!(db.count_users().unwrap(), 0);
    }

    #[tokio::test]
    async fn stale_row_survives_failed_refresh() {
        let db = Arc::new(Database::open_in_memory().unwrap());
        seed_row(&db, Duration::minutes(30));
        let (svc, _calls) = service(&db, true);

        let err = svc.get_user(1, false).await.unwrap_err();
        assert!(matches!(err, SyncError::UpstreamUnavailable(_)));

        // The old row is still there, untouched.
        let row = db.get_user(1).unwrap().unwrap();
        assert_eq!(row.username, "bret");
    }
}
