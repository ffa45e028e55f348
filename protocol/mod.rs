pub mod parser;
pub mod response;

pub use parser::{ProtocolError, RespParser, RespValue};
pub use response::RespResponse;
