use thiserror::Error;

/// 单个 bulk string 或数组允许的最大长度
pub const MAX_FRAME_LEN: i64 = 1024 * 1024;

/// 数组允许的最大嵌套层数，命令本身是一层扁平数组
pub const MAX_NESTING_DEPTH: usize = 8;

/// 连接上允许缓冲的未完成帧的最大字节数
pub const MAX_BUFFERED_BYTES: usize = MAX_FRAME_LEN as usize + 1024;

#[derive(Debug, Clone, PartialEq)]
pub enum RespValue {
    SimpleString(String),
    Error(String),
    Integer(i64),
    BulkString(Option<String>),
    Array(Option<Vec<RespValue>>),
}

/// RESP 解析错误
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("incomplete frame")]
    Incomplete,

    #[error("invalid integer: {0}")]
    InvalidInteger(String),

    #[error("invalid length: {0}")]
    InvalidLength(i64),

    #[error("bulk string is missing its CRLF terminator")]
    MissingTerminator,

    #[error("arrays nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("frame too large")]
    FrameTooLarge,

    #[error("invalid utf-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}

pub struct RespParser;

impl Default for RespParser {
    fn default() -> Self {
        Self::new()
    }
}

impl RespParser {
    pub fn new() -> Self {
        Self
    }

    /// 解析一个完整的 RESP 值，数据不完整时返回 [`ProtocolError::Incomplete`]
    pub fn parse(&self, input: &[u8]) -> Result<RespValue, ProtocolError> {
        self.parse_frame(input)?
            .map(|(value, _)| value)
            .ok_or(ProtocolError::Incomplete)
    }

    /// Parses one frame from the front of `input`.
    ///
    /// Returns `Ok(None)` when more bytes are needed, otherwise the value and
    /// the number of bytes it occupied. Lines that do not start with a RESP
    /// type byte are treated as inline commands and split on whitespace.
    pub fn parse_frame(&self, input: &[u8]) -> Result<Option<(RespValue, usize)>, ProtocolError> {
        self.parse_at(input, 0, 0)
    }

    fn parse_at(
        &self,
        input: &[u8],
        pos: usize,
        depth: usize,
    ) -> Result<Option<(RespValue, usize)>, ProtocolError> {
        let Some((line, next)) = read_line(input, pos) else {
            return Ok(None);
        };

        let Some((&prefix, body)) = line.split_first() else {
            // 空行当作空的内联命令
            return Ok(Some((RespValue::Array(Some(Vec::new())), next)));
        };

        match prefix {
            b'+' => Ok(Some((
                RespValue::SimpleString(std::str::from_utf8(body)?.to_string()),
                next,
            ))),
            b'-' => Ok(Some((
                RespValue::Error(std::str::from_utf8(body)?.to_string()),
                next,
            ))),
            b':' => Ok(Some((RespValue::Integer(parse_integer(body)?), next))),
            b'$' => {
                let len = parse_length(body)?;
                let Some(len) = len else {
                    return Ok(Some((RespValue::BulkString(None), next)));
                };

                let end = next + len;
                if input.len() < end + 2 {
                    return Ok(None);
                }
                if &input[end..end + 2] != b"\r\n" {
                    return Err(ProtocolError::MissingTerminator);
                }
                let s = std::str::from_utf8(&input[next..end])?.to_string();
                Ok(Some((RespValue::BulkString(Some(s)), end + 2)))
            }
            b'*' => {
                if depth >= MAX_NESTING_DEPTH {
                    return Err(ProtocolError::TooDeep(MAX_NESTING_DEPTH));
                }
                let len = parse_length(body)?;
                let Some(len) = len else {
                    return Ok(Some((RespValue::Array(None), next)));
                };

                let mut items = Vec::with_capacity(len.min(64));
                let mut cursor = next;
                for _ in 0..len {
                    match self.parse_at(input, cursor, depth + 1)? {
                        Some((value, after)) => {
                            items.push(value);
                            cursor = after;
                        }
                        None => return Ok(None),
                    }
                }
                Ok(Some((RespValue::Array(Some(items)), cursor)))
            }
            _ => {
                let text = std::str::from_utf8(line)?;
                let parts = text
                    .split_whitespace()
                    .map(|part| RespValue::BulkString(Some(part.to_string())))
                    .collect();
                Ok(Some((RespValue::Array(Some(parts)), next)))
            }
        }
    }
}

/// 读取 `pos` 开始的一行（不含 CRLF），返回该行和下一行的起始位置
fn read_line(input: &[u8], pos: usize) -> Option<(&[u8], usize)> {
    let rest = input.get(pos..)?;
    let end = rest.windows(2).position(|w| w == b"\r\n")?;
    Some((&rest[..end], pos + end + 2))
}

fn parse_integer(body: &[u8]) -> Result<i64, ProtocolError> {
    let text = std::str::from_utf8(body)?;
    text.parse::<i64>()
        .map_err(|_| ProtocolError::InvalidInteger(text.to_string()))
}

/// 长度为 -1 表示 null，返回 None
fn parse_length(body: &[u8]) -> Result<Option<usize>, ProtocolError> {
    match parse_integer(body)? {
        -1 => Ok(None),
        len if (0..=MAX_FRAME_LEN).contains(&len) => Ok(Some(len as usize)),
        len => Err(ProtocolError::InvalidLength(len)),
    }
}
