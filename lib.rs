pub mod client;
pub mod commands;
pub mod config;
pub mod index;
pub mod model;
pub mod protocol;
pub mod server;
pub mod storage;

use std::error::Error;

// 重新导出主要的公共接口
pub use crate::config::RadiusConfig;
pub use index::GridIndex;
pub use model::{Coordinate, Post, PostId, PostRequest, ValidationError};
pub use storage::{open_store, IndexedMemoryStore, MemoryStore, PostStore, StoreBackend, StoreError};

// 重新导出常用类型，便于二进制文件使用
pub use client::{CliArgs, ClientConnection, OutputFormatter};
pub use server::TcpServer;

pub type Result<T> = std::result::Result<T, Box<dyn Error + Send + Sync>>;
