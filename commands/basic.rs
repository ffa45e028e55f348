use std::sync::Arc;

use crate::commands::Command;
use crate::protocol::parser::RespValue;
use crate::protocol::response::RespResponse;
use crate::storage::PostStore;
use crate::Result;

pub struct PingCommand;

impl Command for PingCommand {
    fn name(&self) -> &'static str {
        "PING"
    }

    fn execute(&self, args: &[RespValue]) -> Result<String> {
        match args {
            [] => Ok(RespResponse::simple_string("PONG")),
            [RespValue::BulkString(Some(msg))] => Ok(RespResponse::bulk_string(Some(msg))),
            [_] => Ok(RespResponse::error("ERR wrong argument type")),
            _ => Ok(RespResponse::error(
                "ERR wrong number of arguments for 'ping' command",
            )),
        }
    }
}

pub struct HelloCommand;

impl Command for HelloCommand {
    fn name(&self) -> &'static str {
        "HELLO"
    }

    fn execute(&self, _args: &[RespValue]) -> Result<String> {
        let info = vec![
            RespValue::BulkString(Some("server".to_string())),
            RespValue::BulkString(Some("radius".to_string())),
            RespValue::BulkString(Some("version".to_string())),
            RespValue::BulkString(Some(env!("CARGO_PKG_VERSION").to_string())),
            RespValue::BulkString(Some("proto".to_string())),
            RespValue::Integer(2),
            RespValue::BulkString(Some("mode".to_string())),
            RespValue::BulkString(Some("standalone".to_string())),
        ];

        Ok(RespResponse::array(Some(&info)))
    }
}

/// QUIT 只回复 OK，连接由服务端在写出回复后关闭
pub struct QuitCommand;

impl Command for QuitCommand {
    fn name(&self) -> &'static str {
        "QUIT"
    }

    fn execute(&self, _args: &[RespValue]) -> Result<String> {
        Ok(RespResponse::simple_string("OK"))
    }
}

/// 健康检查：返回 `{"healthy": bool}`
pub struct HealthCommand {
    store: Arc<dyn PostStore>,
}

impl HealthCommand {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }
}

impl Command for HealthCommand {
    fn name(&self) -> &'static str {
        "HEALTH"
    }

    fn execute(&self, _args: &[RespValue]) -> Result<String> {
        let body = serde_json::json!({ "healthy": self.store.ping() });
        Ok(RespResponse::json(&body))
    }
}
