use redis::aio::ConnectionManager;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur with cache operations
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Redis error: {0}")]
    RedisError(#[from] redis::RedisError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Cache miss: {0}")]
    CacheMiss(String),
}

/// Two-tier cache for catalog lookups
///
/// L1 is an in-process moka cache, L2 is Redis shared by every instance.
/// Both tiers hold the JSON encoding of the cached value.
pub struct CacheManager {
    redis: Arc<tokio::sync::Mutex<ConnectionManager>>,
    l1_cache: moka::future::Cache<String, String>,
    ttl_secs: u64,
}

impl CacheManager {
    pub async fn new(redis_url: &str, l1_size: u64, ttl_secs: u64) -> Result<Self, CacheError> {
        let client = redis::Client::open(redis_url)?;
        let redis = ConnectionManager::new(client).await?;

        let l1_cache = moka::future::CacheBuilder::new(l1_size)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Ok(Self {
            redis: Arc::new(tokio::sync::Mutex::new(redis)),
            l1_cache,
            ttl_secs,
        })
    }

    /// Read a value, L1 first, then L2 (which repopulates L1)
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T, CacheError> {
        if let Some(json) = self.l1_cache.get(key).await {
            tracing::trace!("L1 cache hit: {}", key);
            return Ok(serde_json::from_str(&json)?);
        }

        let value: Option<String> = {
            let mut conn = self.redis.lock().await;
            redis::cmd("GET").arg(key).query_async(&mut *conn).await?
        };

        match value {
            Some(json) => {
                tracing::trace!("L2 cache hit: {}", key);
                let decoded = serde_json::from_str(&json)?;
                self.l1_cache.insert(key.to_string(), json).await;
                Ok(decoded)
            }
            None => Err(CacheError::CacheMiss(key.to_string())),
        }
    }

    /// Write a value to both tiers
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), CacheError> {
        let json = serde_json::to_string(value)?;
        self.l1_cache.insert(key.to_string(), json.clone()).await;

        let mut conn = self.redis.lock().await;
        redis::cmd("SETEX")
            .arg(key)
            .arg(self.ttl_secs)
            .arg(json)
            .query_async::<()>(&mut *conn)
            .await?;

        tracing::trace!("Cache set: {}", key);
        Ok(())
    }

    /// Return the cached value or load and cache it
    ///
    /// Cache failures are logged and fall through to the loader; only loader
    /// errors are returned.
    pub async fn get_or_load<T, E, F, Fut>(&self, key: &str, load: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.get::<T>(key).await {
            Ok(value) => return Ok(value),
            Err(CacheError::CacheMiss(_)) => {}
            Err(e) => tracing::warn!("Cache read failed for {}: {}", key, e),
        }

        let value = load().await?;

        if let Err(e) = self.set(key, &value).await {
            tracing::warn!("Cache write failed for {}: {}", key, e);
        }

        Ok(value)
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            l1_size: self.l1_cache.entry_count(),
            ttl_secs: self.ttl_secs,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub l1_size: u64,
    pub ttl_secs: u64,
}

/// Cache key builder
pub struct CacheKey;

impl CacheKey {
    pub fn categories() -> String {
        "catalog:categories".to_string()
    }

    pub fn services(category_id: i64) -> String {
        format!("catalog:services:{}", category_id)
    }

    pub fn regions() -> String {
        "catalog:regions".to_string()
    }

    pub fn questions() -> String {
        "catalog:questions".to_string()
    }

    pub fn genders() -> String {
        "catalog:genders".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "Requires Redis"]
    async fn test_get_or_load_caches_value() {
        let cache = CacheManager::new("redis://127.0.0.1:6379", 100, 60)
            .await
            .expect("Failed to create cache");

        let key = "catalog:test";
        let loaded: Result<Vec<i64>, CacheError> =
            cache.get_or_load(key, || async { Ok(vec![1, 2, 3]) }).await;
        assert_eq!(loaded.unwrap(), vec![1, 2, 3]);

        let cached: Vec<i64> = cache.get(key).await.unwrap();
        assert_eq!(cached, vec![1, 2, 3]);
    }

    #[test]
    fn test_cache_key_builder() {
        assert_eq!(CacheKey::categories(), "catalog:categories");
        assert_eq!(CacheKey::services(4), "catalog:services:4");
        assert_eq!(CacheKey::regions(), "catalog:regions");
        assert_eq!(CacheKey::questions(), "catalog:questions");
        assert_eq!(CacheKey::genders(), "catalog:genders");
    }
}
