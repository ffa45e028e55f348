//! Coarse latitude/longitude grid over post identifiers.
//!
//! Each post lives in the cell obtained by rounding its latitude and
//! longitude to the nearest whole degree, which gives cells of roughly
//! 111 km × (111 km · cos(lat)). A lookup returns the ids of the query cell
//! and its neighbours; exact distance filtering is left to the caller.
//!
//! Known limitation: with the default single ring (3×3 block), a query
//! radius wider than about one cell can miss posts that are within the
//! radius but outside the block. The grid also does not wrap across the
//! antimeridian, so cell 180 and cell -180 are not neighbours.

use std::collections::HashMap;

use crate::model::{Coordinate, Post, PostId};

/// 默认搜索环数：1 表示以查询格为中心的 3×3 区域
pub const DEFAULT_SEARCH_RINGS: u32 = 1;

/// 最大允许的搜索环数
pub const MAX_SEARCH_RINGS: u32 = 180;

/// 网格单元的键：四舍五入到整数度的（纬度，经度）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub lat: i32,
    pub lon: i32,
}

impl CellKey {
    /// 四舍五入（远离零）到最近的整数度，插入与查询使用同一规则
    pub fn from_coordinate(coordinate: &Coordinate) -> Self {
        Self {
            lat: coordinate.latitude.round() as i32,
            lon: coordinate.longitude.round() as i32,
        }
    }

    fn offset(self, d_lat: i32, d_lon: i32) -> Self {
        Self {
            lat: self.lat.saturating_add(d_lat),
            lon: self.lon.saturating_add(d_lon),
        }
    }
}

/// 网格空间索引，只保存帖子 id，不保存内容
#[derive(Debug)]
pub struct GridIndex {
    cells: HashMap<CellKey, Vec<PostId>>,
    rings: i32,
    len: usize,
}

impl Default for GridIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl GridIndex {
    pub fn new() -> Self {
        Self::with_search_rings(DEFAULT_SEARCH_RINGS)
    }

    /// Builds an index whose lookups cover `(2 * rings + 1)²` cells.
    /// `rings` is clamped to `1..=MAX_SEARCH_RINGS`.
    pub fn with_search_rings(rings: u32) -> Self {
        let rings = rings.clamp(1, MAX_SEARCH_RINGS) as i32;
        Self {
            cells: HashMap::new(),
            rings,
            len: 0,
        }
    }

    pub fn search_rings(&self) -> u32 {
        self.rings as u32
    }

    /// 将帖子 id 追加到所在网格
    pub fn add(&mut self, post: &Post) {
        let key = CellKey::from_coordinate(&post.coordinate);
        self.cells.entry(key).or_default().push(post.id);
        self.len += 1;
    }

    /// 从所在网格中移除帖子 id（交换到末尾后截断，格内顺序无意义）。
    /// id 不存在时什么也不做，返回 false。
    pub fn remove(&mut self, post: &Post) -> bool {
        let key = CellKey::from_coordinate(&post.coordinate);
        let Some(ids) = self.cells.get_mut(&key) else {
            return false;
        };
        let Some(pos) = ids.iter().position(|id| *id == post.id) else {
            return false;
        };

        ids.swap_remove(pos);
        if ids.is_empty() {
            self.cells.remove(&key);
        }
        self.len -= 1;
        true
    }

    /// 返回查询点所在网格及其相邻网格中的全部候选 id
    pub fn candidates(&self, coordinate: &Coordinate) -> Vec<PostId> {
        let center = CellKey::from_coordinate(coordinate);
        let mut candidates = Vec::new();

        for d_lat in -self.rings..=self.rings {
            for d_lon in -self.rings..=self.rings {
                if let Some(ids) = self.cells.get(&center.offset(d_lat, d_lon)) {
                    candidates.extend_from_slice(ids);
                }
            }
        }

        candidates
    }

    /// 帖子 id 是否位于它所属的网格中
    pub fn contains(&self, post: &Post) -> bool {
        let key = CellKey::from_coordinate(&post.coordinate);
        self.cells
            .get(&key)
            .is_some_and(|ids| ids.contains(&post.id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &PostId> {
        self.cells.values().flatten()
    }

    /// 索引中的 id 总数
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 非空网格数
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    pub fn clear(&mut self) {
        self.cells.clear();
        self.len = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post_at(lat: f64, lon: f64) -> Post {
        Post::new(Coordinate::new(lat, lon), "test", 60).unwrap()
    }

    #[test]
    fn test_cell_key_rounding() {
        assert_eq!(
            CellKey::from_coordinate(&Coordinate::new(10.4, -10.4)),
            CellKey { lat: 10, lon: -10 }
        );
        assert_eq!(
            CellKey::from_coordinate(&Coordinate::new(10.5, -10.5)),
            CellKey { lat: 11, lon: -11 }
        );
        assert_eq!(
            CellKey::from_coordinate(&Coordinate::new(-0.2, 0.2)),
            CellKey { lat: 0, lon: 0 }
        );
    }

    #[test]
    fn test_add_and_candidates() {
        let mut index = GridIndex::new();
        let p = post_at(10.0, 10.0);
        index.add(&p);

        assert_eq!(index.len(), 1);
        assert_eq!(index.cell_count(), 1);
        assert!(index.contains(&p));
        assert_eq!(index.candidates(&Coordinate::new(10.0, 10.0)), vec![p.id]);
        // 相邻网格也能找到
        assert_eq!(index.candidates(&Coordinate::new(11.0, 9.0)), vec![p.id]);
    }

    #[test]
    fn test_candidates_limited_to_neighbourhood() {
        let mut index = GridIndex::new();
        let near = post_at(10.0, 10.0);
        let far = post_at(12.0, 10.0);
        index.add(&near);
        index.add(&far);

        let found = index.candidates(&Coordinate::new(10.0, 10.0));
        assert!(found.contains(&near.id));
        assert!(!found.contains(&far.id));
    }

    #[test]
    fn test_wider_rings_reach_further() {
        let mut index = GridIndex::with_search_rings(2);
        let far = post_at(12.0, 8.0);
        index.add(&far);

        assert_eq!(index.search_rings(), 2);
        assert_eq!(index.candidates(&Coordinate::new(10.0, 10.0)), vec![far.id]);
        assert!(index
            .candidates(&Coordinate::new(9.0, 10.0))
            .is_empty());
    }

    #[test]
    fn test_rings_clamped() {
        assert_eq!(GridIndex::with_search_rings(0).search_rings(), 1);
        assert_eq!(
            GridIndex::with_search_rings(10_000).search_rings(),
            MAX_SEARCH_RINGS
        );
    }

    #[test]
    fn test_remove() {
        let mut index = GridIndex::new();
        let a = post_at(10.0, 10.0);
        let b = post_at(10.1, 10.1);
        let c = post_at(10.2, 9.9);
        index.add(&a);
        index.add(&b);
        index.add(&c);

        assert!(index.remove(&a));
        assert!(!index.contains(&a));
        assert!(index.contains(&b));
        assert!(index.contains(&c));
        assert_eq!(index.len(), 2);

        // 不存在的 id 不报错
        assert!(!index.remove(&a));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_remove_drops_empty_cell() {
        let mut index = GridIndex::new();
        let p = post_at(-33.9, 151.2);
        index.add(&p);
        assert!(index.remove(&p));

        assert!(index.is_empty());
        assert_eq!(index.cell_count(), 0);
        assert_eq!(index.ids().count(), 0);
    }

    #[test]
    fn test_remove_unknown_cell_is_noop() {
        let mut index = GridIndex::new();
        index.add(&post_at(0.0, 0.0));
        assert!(!index.remove(&post_at(50.0, 50.0)));
        assert_eq!(index.len(), 1);
    }
}
