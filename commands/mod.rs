pub mod args;
pub mod basic;
pub mod nearby;
pub mod post;
pub mod registry;
pub mod stats;

use crate::protocol::parser::RespValue;
use crate::Result;

use basic::{HealthCommand, HelloCommand, PingCommand, QuitCommand};
use nearby::NearbyCommand;
use post::PostCommand;
use stats::StatsCommand;

// 重新导出常用的类型
pub use args::{ArgumentParser, NearbyArgs, PostArgs};
pub use registry::CommandRegistry;

pub trait Command {
    fn name(&self) -> &'static str;
    fn execute(&self, args: &[RespValue]) -> Result<String>;
}

pub enum CommandType {
    Ping(PingCommand),
    Hello(HelloCommand),
    Quit(QuitCommand),
    Health(HealthCommand),
    Post(PostCommand),
    Nearby(NearbyCommand),
    Stats(StatsCommand),
}

impl CommandType {
    fn name(&self) -> &'static str {
        match self {
            CommandType::Ping(cmd) => cmd.name(),
            CommandType::Hello(cmd) => cmd.name(),
            CommandType::Quit(cmd) => cmd.name(),
            CommandType::Health(cmd) => cmd.name(),
            CommandType::Post(cmd) => cmd.name(),
            CommandType::Nearby(cmd) => cmd.name(),
            CommandType::Stats(cmd) => cmd.name(),
        }
    }

    fn execute(&self, args: &[RespValue]) -> Result<String> {
        match self {
            CommandType::Ping(cmd) => cmd.execute(args),
            CommandType::Hello(cmd) => cmd.execute(args),
            CommandType::Quit(cmd) => cmd.execute(args),
            CommandType::Health(cmd) => cmd.execute(args),
            CommandType::Post(cmd) => cmd.execute(args),
            CommandType::Nearby(cmd) => cmd.execute(args),
            CommandType::Stats(cmd) => cmd.execute(args),
        }
    }
}
