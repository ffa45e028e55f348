use std::sync::Arc;

use crate::commands::{ArgumentParser, Command};
use crate::protocol::parser::RespValue;
use crate::protocol::RespResponse;
use crate::storage::PostStore;
use crate::Result;

/// STATS：返回帖子数、索引 id 数和网格数
pub struct StatsCommand {
    store: Arc<dyn PostStore>,
}

impl StatsCommand {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }
}

impl Command for StatsCommand {
    fn name(&self) -> &'static str {
        "STATS"
    }

    fn execute(&self, args: &[RespValue]) -> Result<String> {
        if let Err(err_msg) = ArgumentParser::new(args, "STATS").check_arg_count(0) {
            return Ok(RespResponse::error(&err_msg));
        }

        let stats = match self.store.stats() {
            Ok(stats) => stats,
            Err(e) => return Ok(RespResponse::error(&format!("ERR storage error: {}", e))),
        };

        let pair = |name: &str, value: usize| {
            [
                RespValue::BulkString(Some(name.to_string())),
                RespValue::Integer(i64::try_from(value).unwrap_or(i64::MAX)),
            ]
        };

        let items: Vec<RespValue> = [
            pair("posts", stats.posts),
            pair("indexed", stats.indexed),
            pair("cells", stats.cells),
        ]
        .into_iter()
        .flatten()
        .collect();

        Ok(RespResponse::array(Some(&items)))
    }
}
