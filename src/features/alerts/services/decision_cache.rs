use std::time::Duration;
use uuid::Uuid;

use crate::shared::cache::{CacheStats, TtlCache};

#[derive(Debug, Clone, Copy)]
struct CachedDecision {
    aqi: i32,
    alert: bool,
}

/// Memo of alert decisions keyed by `(user_id, city_id)`.
///
/// A stored decision only answers for the AQI it was computed from.
#[derive(Clone)]
pub struct DecisionCache {
    cache: TtlCache<(Uuid, Uuid), CachedDecision>,
}

impl DecisionCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            cache: TtlCache::new("alert_decisions", ttl),
        }
    }

    pub fn get(&self, user_id: Uuid, city_id: Uuid, aqi: i32) -> Option<bool> {
        self.cache
            .get(&(user_id, city_id))
            .filter(|decision| decision.aqi == aqi)
            .map(|decision| decision.alert)
    }

    pub fn record(&self, user_id: Uuid, city_id: Uuid, aqi: i32, alert: bool) {
        self.cache
            .insert((user_id, city_id), CachedDecision { aqi, alert });
    }

    /// Drops every decision for a user, e.g. after a preference change
    pub fn evict_user(&self, user_id: Uuid) -> usize {
        self.cache.invalidate_where(|(owner, _)| *owner == user_id)
    }

    pub fn evict_city(&self, user_id: Uuid, city_id: Uuid) {
        self.cache.invalidate(&(user_id, city_id));
    }

    pub fn stats(&self) -> CacheStats {
        self.cache.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hit_requires_same_aqi() {
        let cache = DecisionCache::new(Duration::from_secs(60));
        let (user, city) = (Uuid::now_v7(), Uuid::now_v7());
        cache.record(user, city, 4, true);

        assert_eq!(cache.get(user, city, 4), Some(true));
        assert_eq!(cache.get(user, city, 2), None);
    }

    #[test]
    fn test_evict_user_only_touches_that_user() {
        let cache = DecisionCache::new(Duration::from_secs(60));
        let (alice, bob, city) = (Uuid::now_v7(), Uuid::now_v7(), Uuid::now_v7());
        cache.record(alice, city, 3, true);
        cache.record(alice, Uuid::now_v7(), 1, false);
        cache.record(bob, city, 3, true);

        assert_eq!(cache.evict_user(alice), 2);
        assert_eq!(cache.get(alice, city, 3), None);
        assert_eq!(cache.get(bob, city, 3), Some(true));
    }

    #[test]
    fn test_evict_city() {
        let cache = DecisionCache::new(Duration::from_secs(60));
        let (user, city) = (Uuid::now_v7(), Uuid::now_v7());
        cache.record(user, city, 5, true);
        cache.evict_city(user, city);
        assert_eq!(cache.get(user, city, 5), None);
        assert_eq!(cache.stats().entries, 0);
    }
}
