use std::io::{Read, Write};
use std::net::TcpStream;

use crate::protocol::parser::RespValue;
use crate::protocol::RespParser;
use crate::Result;

pub struct ClientConnection {
    stream: Option<TcpStream>,
    host: String,
    port: u16,
    parser: RespParser,
}

impl ClientConnection {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            stream: None,
            host: host.to_string(),
            port,
            parser: RespParser::new(),
        }
    }

    pub fn connect(&mut self) -> Result<()> {
        let addr = format!("{}:{}", self.host, self.port);
        let stream = TcpStream::connect(&addr)?;
        self.stream = Some(stream);
        Ok(())
    }

    pub fn send_command(&mut self, cmd: &[String]) -> Result<RespValue> {
        let command = Self::build_resp_command(cmd);

        if self.stream.is_none() {
            self.connect()?;
        }
        let stream = self.stream.as_mut().ok_or("connection unavailable")?;

        stream.write_all(command.as_bytes())?;

        // 读到能解析出一个完整回复为止，数组回复可能跨多次读取
        let mut buffer = Vec::new();
        let mut temp = [0; 4096];

        loop {
            if let Some((response, _)) = self.parser.parse_frame(&buffer)? {
                return Ok(response);
            }

            let n = stream.read(&mut temp)?;
            if n == 0 {
                self.stream = None;
                return Err("server closed the connection".into());
            }
            buffer.extend_from_slice(&temp[..n]);
        }
    }

    pub fn disconnect(&mut self) -> Result<()> {
        if let Some(stream) = self.stream.take() {
            stream.shutdown(std::net::Shutdown::Both)?;
        }
        Ok(())
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    fn build_resp_command(cmd: &[String]) -> String {
        if cmd.is_empty() {
            return String::new();
        }

        // 构建 RESP 数组格式，长度按字节计算
        let mut result = format!("*{}\r\n", cmd.len());

        for arg in cmd {
            result.push_str(&format!("${}\r\n{}\r\n", arg.len(), arg));
        }

        result
    }
}
