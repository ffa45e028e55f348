use std::sync::Arc;

use tracing::{debug, warn};

use crate::commands::{ArgumentParser, Command};
use crate::protocol::parser::RespValue;
use crate::protocol::RespResponse;
use crate::storage::PostStore;
use crate::Result;

/// NEARBY lat lon radius_km
///
/// 返回半径内仍然有效的帖子，每个元素是一条帖子的 JSON。顺序不固定。
pub struct NearbyCommand {
    store: Arc<dyn PostStore>,
}

impl NearbyCommand {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }
}

impl Command for NearbyCommand {
    fn name(&self) -> &'static str {
        "NEARBY"
    }

    fn execute(&self, args: &[RespValue]) -> Result<String> {
        let parsed = match ArgumentParser::new(args, "NEARBY").parse_nearby_args() {
            Ok(parsed) => parsed,
            Err(err_msg) => return Ok(RespResponse::error(&err_msg)),
        };

        let posts = match self.store.nearby_posts(&parsed.coordinate, parsed.radius_km) {
            Ok(posts) => posts,
            Err(e) => {
                warn!("Nearby query failed: {}", e);
                return Ok(RespResponse::error(&format!("ERR storage error: {}", e)));
            }
        };

        debug!(
            location = %parsed.coordinate,
            radius_km = parsed.radius_km,
            found = posts.len(),
            "Nearby query"
        );

        let mut resp_values = Vec::with_capacity(posts.len());
        for post in &posts {
            resp_values.push(RespValue::BulkString(Some(serde_json::to_string(post)?)));
        }

        Ok(RespResponse::array(Some(&resp_values)))
    }
}
