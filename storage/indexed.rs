use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use super::{PostStore, StoreError, StoreStats};
use crate::index::GridIndex;
use crate::model::{unix_now, Coordinate, Post, PostId};

/// 主表与空间索引，二者始终在同一把锁下一起修改
#[derive(Debug)]
struct PostTable {
    posts: HashMap<PostId, Post>,
    index: GridIndex,
}

impl PostTable {
    fn new(search_rings: u32) -> Self {
        Self {
            posts: HashMap::new(),
            index: GridIndex::with_search_rings(search_rings),
        }
    }

    /// 删除所有 `created_at + lifetime < now` 的帖子，返回删除数量
    fn sweep(&mut self, now: i64) -> usize {
        let Self { posts, index } = self;
        let before = posts.len();

        posts.retain(|_, post| {
            if post.is_expired_at(now) {
                index.remove(post);
                false
            } else {
                true
            }
        });

        let removed = before - posts.len();
        if removed > 0 {
            debug!(removed, remaining = posts.len(), "Swept expired posts");
        }
        removed
    }

    fn insert(&mut self, post: Post) {
        self.index.add(&post);
        // 同一 id 重复保存时，先把旧位置从索引里移除
        if let Some(previous) = self.posts.insert(post.id, post) {
            self.index.remove(&previous);
        }
    }

    fn nearby(&self, coordinate: &Coordinate, radius_km: f64) -> Vec<Post> {
        self.index
            .candidates(coordinate)
            .iter()
            .filter_map(|id| self.posts.get(id))
            .filter(|post| coordinate.distance_km(&post.coordinate) <= radius_km)
            .cloned()
            .collect()
    }

    fn stats(&self) -> StoreStats {
        StoreStats {
            posts: self.posts.len(),
            indexed: self.index.len(),
            cells: self.index.cell_count(),
        }
    }
}

/// 带网格索引的内存存储
///
/// 查询只检查查询点周围网格中的候选帖子，再按精确距离过滤。
/// 所有操作（包括过期清理）都在同一个互斥锁内完成，读者不会看到主表
/// 与索引不一致的状态。
#[derive(Debug)]
pub struct IndexedMemoryStore {
    state: Mutex<Option<PostTable>>,
}

impl Default for IndexedMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl IndexedMemoryStore {
    pub fn new() -> Self {
        Self::with_search_rings(crate::index::DEFAULT_SEARCH_RINGS)
    }

    pub fn with_search_rings(search_rings: u32) -> Self {
        Self {
            state: Mutex::new(Some(PostTable::new(search_rings))),
        }
    }

    /// 获取锁并先执行一次过期清理
    fn swept(&self) -> Result<(MutexGuard<'_, Option<PostTable>>, usize), StoreError> {
        let mut guard = self.state.lock()?;
        let removed = guard
            .as_mut()
            .ok_or(StoreError::Closed)?
            .sweep(unix_now());
        Ok((guard, removed))
    }

    fn with_table<T>(&self, f: impl FnOnce(&mut PostTable) -> T) -> Result<T, StoreError> {
        let (mut guard, _) = self.swept()?;
        let table = guard.as_mut().ok_or(StoreError::Closed)?;
        Ok(f(table))
    }
}

impl PostStore for IndexedMemoryStore {
    fn save_post(&self, post: Post) -> Result<(), StoreError> {
        self.with_table(|table| {
            debug!(id = %post.id, location = %post.coordinate, "Saving post");
            table.insert(post);
        })
    }

    fn nearby_posts(
        &self,
        coordinate: &Coordinate,
        radius_km: f64,
    ) -> Result<Vec<Post>, StoreError> {
        self.with_table(|table| table.nearby(coordinate, radius_km))
    }

    fn purge_expired(&self) -> Result<usize, StoreError> {
        let (_guard, removed) = self.swept()?;
        Ok(removed)
    }

    fn stats(&self) -> Result<StoreStats, StoreError> {
        self.with_table(|table| table.stats())
    }

    fn ping(&self) -> bool {
        self.state
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }

    fn close(&self) -> Result<(), StoreError> {
        let mut guard = self.state.lock()?;
        if let Some(mut table) = guard.take() {
            info!(posts = table.posts.len(), "Closing indexed store");
            table.index.clear();
            table.posts.clear();
        }
        Ok(())
    }
}
