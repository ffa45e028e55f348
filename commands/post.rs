use std::sync::Arc;

use tracing::{info, warn};

use crate::commands::{ArgumentParser, Command};
use crate::protocol::parser::RespValue;
use crate::protocol::RespResponse;
use crate::storage::PostStore;
use crate::Result;

/// POST lat lon duration content...
///
/// 创建帖子并返回其 JSON 表示（包含服务端分配的 id 和 created_at）
pub struct PostCommand {
    store: Arc<dyn PostStore>,
}

impl PostCommand {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }
}

impl Command for PostCommand {
    fn name(&self) -> &'static str {
        "POST"
    }

    fn execute(&self, args: &[RespValue]) -> Result<String> {
        let parsed = match ArgumentParser::new(args, "POST").parse_post_args() {
            Ok(parsed) => parsed,
            Err(err_msg) => return Ok(RespResponse::error(&err_msg)),
        };

        let post = match parsed.request.into_post() {
            Ok(post) => post,
            Err(e) => return Ok(RespResponse::error(&format!("ERR {}", e))),
        };

        match self.store.save_post(post.clone()) {
            Ok(()) => {
                info!(id = %post.id, location = %post.coordinate, duration = post.lifetime_secs, "Post created");
                Ok(RespResponse::json(&post))
            }
            Err(e) => {
                warn!("Failed to save post: {}", e);
                Ok(RespResponse::error(&format!("ERR storage error: {}", e)))
            }
        }
    }
}
