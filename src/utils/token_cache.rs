use moka::future::Cache;
use std::time::Duration;

/// Refresh-token ids that were rotated or logged out. Entries expire with the
/// refresh TTL, after which the token is rejected by its own `exp` anyway.
#[derive(Clone)]
pub struct RevokedTokens {
    cache: Cache<String, ()>,
}

impl RevokedTokens {
    pub fn new(refresh_ttl_secs: usize) -> Self {
        Self {
            cache: Cache::builder()
                .max_capacity(500_000) // tune based on memory
                .time_to_live(Duration::from_secs(refresh_ttl_secs as u64))
                .build(),
        }
    }

    /// Revokes `jti` and reports whether this call did it. Only one of any
    /// number of concurrent callers sees `true`.
    pub async fn revoke_once(&self, jti: &str) -> bool {
        self.cache
            .entry(jti.to_string())
            .or_insert(())
            .await
            .is_fresh()
    }
}
