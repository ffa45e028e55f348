use std::sync::Mutex;

use tracing::{debug, info};

use super::{PostStore, StoreError, StoreStats};
use crate::model::{unix_now, Coordinate, Post};

/// 线性扫描的内存存储，不建索引，每次查询遍历全部帖子
#[derive(Debug)]
pub struct MemoryStore {
    posts: Mutex<Option<Vec<Post>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            posts: Mutex::new(Some(Vec::new())),
        }
    }

    fn with_posts<T>(&self, f: impl FnOnce(&mut Vec<Post>, usize) -> T) -> Result<T, StoreError> {
        let mut guard = self.posts.lock()?;
        let posts = guard.as_mut().ok_or(StoreError::Closed)?;

        let now = unix_now();
        let before = posts.len();
        posts.retain(|post| !post.is_expired_at(now));
        let removed = before - posts.len();
        if removed > 0 {
            debug!(removed, remaining = posts.len(), "Swept expired posts");
        }

        Ok(f(posts, removed))
    }
}

impl PostStore for MemoryStore {
    fn save_post(&self, post: Post) -> Result<(), StoreError> {
        self.with_posts(|posts, _| {
            debug!(id = %post.id, location = %post.coordinate, "Saving post");
            posts.retain(|existing| existing.id != post.id);
            posts.push(post);
        })
    }

    fn nearby_posts(
        &self,
        coordinate: &Coordinate,
        radius_km: f64,
    ) -> Result<Vec<Post>, StoreError> {
        self.with_posts(|posts, _| {
            posts
                .iter()
                .filter(|post| coordinate.distance_km(&post.coordinate) <= radius_km)
                .cloned()
                .collect()
        })
    }

    fn purge_expired(&self) -> Result<usize, StoreError> {
        self.with_posts(|_, removed| removed)
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        self.with_posts(|posts, _| StoreStats {
            posts: posts.len(),
            ..StoreStats::default()
        })
    }

    fn ping(&self) -> bool {
        self.posts
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    fn close(&self) -> Result<(), StoreError> {
        let mut guard = self.posts.lock()?;
        if let Some(posts) = guard.take() {
            info!(posts = posts.len(), "Closing memory store");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_at(lat: f64, lon: f64, lifetime: i64) -> Post {
        Post::new(Coordinate::new(lat, lon), "test", lifetime).unwrap()
    }

    #[test]
    fn test_save_and_query() {
        let store = MemoryStore::new();
        let post = post_at(10.0, 10.0, 60);
        store.save_post(post.clone()).unwrap();

        let here = Coordinate::new(10.0, 10.0);
        assert_eq!(store.nearby_posts(&here, 0.0).unwrap(), vec![post]);
        assert!(store
            .nearby_posts(&Coordinate::new(20.0, 20.0), 1.0)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_no_neighbourhood_limit() {
        // 线性扫描没有网格限制，大半径可以找到远处的帖子
        let store = MemoryStore::new();
        let far = post_at(13.0, 10.0, 60);
        store.save_post(far.clone()).unwrap();

        assert_eq!(
            store.nearby_posts(&Coordinate::new(10.0, 10.0), 500.0).unwrap(),
            vec![far]
        );
    }

    #[test]
    fn test_expired_posts_removed() {
        let store = MemoryStore::new();
        store
            .save_post(post_at(0.0, 0.0, 10).with_created_at(unix_now() - 60))
            .unwrap();
        assert_eq!(store.purge_expired().unwrap(), 1);
        assert_eq!(store.stats().unwrap().posts, 0);
    }

    #[test]
    fn test_duplicate_save_replaces() {
        let store = MemoryStore::new();
        let post = post_at(5.0, 5.0, 60);
        store.save_post(post.clone()).unwrap();
        store.save_post(post).unwrap();
        assert_eq!(store.stats().unwrap().posts, 1);
    }

    #[test]
    fn test_close() {
        let store = MemoryStore::new();
        store.close().unwrap();
        assert!(!store.ping());
        assert!(matches!(
            store.save_post(post_at(0.0, 0.0, 60)),
            Err(StoreError::Closed)
        ));
    }
}
