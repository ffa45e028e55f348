use std::collections::HashMap;
use std::sync::Arc;

use crate::protocol::parser::RespValue;
use crate::protocol::RespResponse;
use crate::storage::PostStore;
use crate::Result;

use super::{
    basic::{HealthCommand, HelloCommand, PingCommand, QuitCommand},
    nearby::NearbyCommand,
    post::PostCommand,
    stats::StatsCommand,
    CommandType,
};

/// 命令注册表，管理所有可用的命令
pub struct CommandRegistry {
    commands: HashMap<String, CommandType>,
}

impl CommandRegistry {
    /// 创建新的命令注册表
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        let mut registry = Self {
            commands: HashMap::new(),
        };

        // 注册基础命令
        registry.register(CommandType::Ping(PingCommand));
        registry.register(CommandType::Hello(HelloCommand));
        registry.register(CommandType::Quit(QuitCommand));

        // 注册存储命令
        registry.register(CommandType::Health(HealthCommand::new(Arc::clone(&store))));
        registry.register(CommandType::Post(PostCommand::new(Arc::clone(&store))));
        registry.register(CommandType::Nearby(NearbyCommand::new(Arc::clone(&store))));
        registry.register(CommandType::Stats(StatsCommand::new(store)));

        registry
    }

    /// 注册一个命令
    pub fn register(&mut self, command: CommandType) {
        let name = command.name().to_uppercase();
        self.commands.insert(name, command);
    }

    /// 执行指定的命令
    pub fn execute(&self, command_name: &str, args: &[RespValue]) -> Result<String> {
        let name = command_name.to_uppercase();
        match self.commands.get(&name) {
            Some(command) => command.execute(args),
            None => Ok(RespResponse::error(&format!(
                "ERR unknown command '{}'",
                command_name
            ))),
        }
    }

    /// 获取所有注册的命令名称
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.keys().map(|s| s.as_str()).collect()
    }

    /// 检查命令是否存在
    pub fn has_command(&self, command_name: &str) -> bool {
        let name = command_name.to_uppercase();
        self.commands.contains_key(&name)
    }
}
