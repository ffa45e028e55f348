pub mod grid;

pub use grid::{CellKey, GridIndex, DEFAULT_SEARCH_RINGS, MAX_SEARCH_RINGS};
