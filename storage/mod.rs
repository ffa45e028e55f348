pub mod indexed;
pub mod memory;

use std::str::FromStr;
use std::sync::{Arc, PoisonError};

use serde::Serialize;
use thiserror::Error;

use crate::model::{Coordinate, Post};

pub use indexed::IndexedMemoryStore;
pub use memory::MemoryStore;

/// 存储层错误
#[derive(Debug, Error)]
pub enum StoreError {
    /// 存储已关闭
    #[error("store is closed")]
    Closed,

    /// 持锁线程 panic 导致锁中毒
    #[error("lock was poisoned by a panicked thread")]
    LockPoisoned,

    /// 预留给非内存后端（容量、持久化等）
    #[error("backend error: {0}")]
    Backend(String),
}

impl<T> From<PoisonError<T>> for StoreError {
    fn from(_: PoisonError<T>) -> Self {
        StoreError::LockPoisoned
    }
}

/// 存储统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    /// 主表中的帖子数
    pub posts: usize,
    /// 空间索引中的 id 数（无索引后端为 0）
    pub indexed: usize,
    /// 非空网格数（无索引后端为 0）
    pub cells: usize,
}

/// Capability interface the service layer consumes.
///
/// Every operation sweeps expired posts first, under the same lock as the
/// rest of the operation. Implementations are shared across connection
/// tasks as `Arc<dyn PostStore>`.
pub trait PostStore: Send + Sync {
    /// Stores an already validated post.
    fn save_post(&self, post: Post) -> Result<(), StoreError>;

    /// Returns the live posts within `radius_km` of `coordinate`, in no
    /// particular order. Coordinate and radius are validated by the caller.
    fn nearby_posts(&self, coordinate: &Coordinate, radius_km: f64)
        -> Result<Vec<Post>, StoreError>;

    /// Runs an expiry sweep on its own and reports how many posts it removed.
    fn purge_expired(&self) -> Result<usize, StoreError>;

    fn stats(&self) -> Result<StoreStats, StoreError>;

    /// true until the store is closed.
    fn ping(&self) -> bool;

    /// Drops every post and all index state. The store is not reusable
    /// afterwards: later calls return [`StoreError::Closed`].
    fn close(&self) -> Result<(), StoreError>;
}

/// 存储后端类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    /// 网格索引
    Indexed,
    /// 线性扫描
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "indexed" => Ok(StoreBackend::Indexed),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!(
                "Invalid storage backend: '{}'. Must be one of: indexed, memory",
                other
            )),
        }
    }
}

/// 按后端类型创建存储实例
pub fn open_store(backend: StoreBackend, search_rings: u32) -> Arc<dyn PostStore> {
    match backend {
        StoreBackend::Indexed => Arc::new(IndexedMemoryStore::with_search_rings(search_rings)),
        StoreBackend::Memory => Arc::new(MemoryStore::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_from_str() {
        assert_eq!("indexed".parse::<StoreBackend>(), Ok(StoreBackend::Indexed));
        assert_eq!("MEMORY".parse::<StoreBackend>(), Ok(StoreBackend::Memory));
        assert!("sqlite".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_open_store_backends_behave_alike() {
        for backend in [StoreBackend::Indexed, StoreBackend::Memory] {
            let store = open_store(backend, 1);
            assert!(store.ping());

            let post = Post::new(Coordinate::new(10.0, 10.0), "hello", 60).unwrap();
            store.save_post(post.clone()).unwrap();

            let found = store.nearby_posts(&Coordinate::new(10.0, 10.0), 1.0).unwrap();
            assert_eq!(found, vec![post]);

            store.close().unwrap();
            assert!(!store.ping());
            assert!(matches!(
                store.nearby_posts(&Coordinate::new(10.0, 10.0), 1.0),
                Err(StoreError::Closed)
            ));
        }
    }
}
