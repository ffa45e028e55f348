use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

use crate::commands::CommandRegistry;
use crate::protocol::parser::{ProtocolError, RespValue, MAX_BUFFERED_BYTES};
use crate::protocol::{RespParser, RespResponse};
use crate::Result;

/// 单个客户端连接：缓冲读入的字节，逐帧解析并执行命令
pub struct ServerConnection {
    stream: TcpStream,
    registry: Arc<CommandRegistry>,
    parser: RespParser,
    buffer: Vec<u8>,
}

/// 一条命令执行后的结果
struct Reply {
    body: String,
    close: bool,
}

impl ServerConnection {
    pub fn new(stream: TcpStream, registry: Arc<CommandRegistry>) -> Self {
        Self {
            stream,
            registry,
            parser: RespParser::new(),
            buffer: Vec::with_capacity(4096),
        }
    }

    pub async fn handle(&mut self) -> Result<()> {
        let peer_addr = self.stream.peer_addr()?;
        let mut temp_buffer = [0u8; 4096];

        loop {
            let bytes_read = self.stream.read(&mut temp_buffer).await?;
            if bytes_read == 0 {
                info!("Connection closed by {}", peer_addr);
                break;
            }
            self.buffer.extend_from_slice(&temp_buffer[..bytes_read]);
            debug!("Read {} bytes from {}", bytes_read, peer_addr);

            if !self.process_buffer().await? {
                break;
            }
        }

        info!("Connection with {} closed", peer_addr);
        Ok(())
    }

    /// 执行缓冲区中所有完整的命令帧。返回 false 表示应关闭连接。
    async fn process_buffer(&mut self) -> Result<bool> {
        loop {
            let frame = match self.parser.parse_frame(&self.buffer) {
                Ok(Some(frame)) => frame,
                Ok(None) if self.buffer.len() > MAX_BUFFERED_BYTES => {
                    // 未完成的帧超过上限，不再继续缓冲
                    return self.reject(ProtocolError::FrameTooLarge).await;
                }
                Ok(None) => return Ok(true),
                Err(e) => return self.reject(e).await,
            };

            let (command, used) = frame;
            self.buffer.drain(..used);
            debug!("Parsed command: {:?}", command);

            let Some(reply) = self.execute_command(command)? else {
                continue;
            };

            self.stream.write_all(reply.body.as_bytes()).await?;
            debug!("Sent response: {}", reply.body.trim_end());

            if reply.close {
                return Ok(false);
            }
        }
    }

    /// 协议错误后无法重新同步，回复错误并断开
    async fn reject(&mut self, error: ProtocolError) -> Result<bool> {
        warn!("Protocol error: {}", error);
        let response = RespResponse::error(&format!("ERR protocol error: {}", error));
        self.stream.write_all(response.as_bytes()).await?;
        self.buffer.clear();
        Ok(false)
    }

    fn execute_command(&self, command: RespValue) -> Result<Option<Reply>> {
        let args = match command {
            // 空的内联命令（空行）直接忽略
            RespValue::Array(Some(arr)) if arr.is_empty() => return Ok(None),
            RespValue::Array(Some(arr)) => arr,
            _ => {
                return Ok(Some(Reply {
                    body: RespResponse::error("ERR invalid command format"),
                    close: false,
                }))
            }
        };

        let (name, rest) = match args.split_first() {
            Some((RespValue::BulkString(Some(name)), rest)) => (name.as_str(), rest),
            _ => {
                return Ok(Some(Reply {
                    body: RespResponse::error("ERR invalid command format"),
                    close: false,
                }))
            }
        };

        let body = self.registry.execute(name, rest)?;
        Ok(Some(Reply {
            body,
            close: name.eq_ignore_ascii_case("QUIT"),
        }))
    }
}
