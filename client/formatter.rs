use colored::*;

use crate::model::{unix_now, Post};
use crate::protocol::parser::RespValue;

pub struct OutputFormatter;

impl OutputFormatter {
    pub fn format_response(value: &RespValue) -> String {
        match value {
            RespValue::SimpleString(s) => Self::format_simple_string(s),
            RespValue::Error(err) => Self::format_error(err),
            RespValue::Integer(i) => Self::format_integer(*i),
            RespValue::BulkString(s) => Self::format_bulk_string(s),
            RespValue::Array(arr) => Self::format_array(arr),
        }
    }

    /// 将 POST / NEARBY 的 JSON 回复渲染为帖子列表，其他回复按原样格式化
    pub fn format_posts_response(value: &RespValue) -> String {
        let now = unix_now();
        match value {
            RespValue::BulkString(Some(json)) => match serde_json::from_str::<Post>(json) {
                Ok(post) => Self::format_post(&post, now),
                Err(_) => Self::format_response(value),
            },
            RespValue::Array(Some(values)) if !values.is_empty() => {
                let posts: Option<Vec<Post>> = values
                    .iter()
                    .map(|v| match v {
                        RespValue::BulkString(Some(json)) => serde_json::from_str(json).ok(),
                        _ => None,
                    })
                    .collect();
                match posts {
                    Some(posts) => posts
                        .iter()
                        .map(|post| Self::format_post(post, now))
                        .collect::<Vec<_>>()
                        .join("\n"),
                    None => Self::format_response(value),
                }
            }
            RespValue::Array(Some(_)) => "(no posts nearby)".yellow().to_string(),
            _ => Self::format_response(value),
        }
    }

    /// `[id] (lat, lon) content (expires in Ns)`
    pub fn format_post(post: &Post, now: i64) -> String {
        format!(
            "[{}] {} {} {}",
            post.id.to_string().dimmed(),
            post.coordinate.to_string().cyan(),
            post.content,
            format!("(expires in {}s)", post.remaining_secs(now)).yellow()
        )
    }

    fn format_simple_string(s: &str) -> String {
        s.green().to_string()
    }

    fn format_error(err: &str) -> String {
        format!("(error) {}", err.red())
    }

    fn format_integer(i: i64) -> String {
        format!("(integer) {}", i.to_string().cyan())
    }

    fn format_bulk_string(s: &Option<String>) -> String {
        match s {
            Some(s) => {
                if s.is_empty() {
                    "(empty string)".yellow().to_string()
                } else {
                    s.clone()
                }
            }
            None => "(nil)".red().to_string(),
        }
    }

    fn format_array(arr: &Option<Vec<RespValue>>) -> String {
        match arr {
            Some(values) => {
                if values.is_empty() {
                    "(empty array)".yellow().to_string()
                } else {
                    let mut result = String::new();
                    for (i, value) in values.iter().enumerate() {
                        let formatted_value = match value {
                            RespValue::BulkString(Some(s)) => s.clone(),
                            RespValue::BulkString(None) => "(nil)".to_string(),
                            RespValue::Integer(n) => n.to_string(),
                            RespValue::SimpleString(s) => s.clone(),
                            RespValue::Error(e) => format!("(error) {}", e),
                            RespValue::Array(_) => Self::format_response(value),
                        };
                        result.push_str(&format!(
                            "{}) {}\n",
                            (i + 1).to_string().blue(),
                            formatted_value
                        ));
                    }
                    result.trim_end().to_string()
                }
            }
            None => "(nil)".red().to_string(),
        }
    }

    pub fn format_prompt(host: &str, port: u16) -> String {
        format!("{}:{}> ", host.blue(), port.to_string().blue())
    }

    pub fn format_connecting_message(host: &str, port: u16) -> String {
        format!("Connecting to {}:{}...", host.cyan(), port.to_string().cyan())
    }

    pub fn format_connected_message(host: &str, port: u16) -> String {
        format!("Connected to {}:{}", host.green(), port.to_string().green())
    }

    pub fn format_disconnected_message() -> String {
        "Disconnected".red().to_string()
    }

    pub fn format_help_message() -> String {
        let help = r#"
Available commands:
  PING [message]                      - Test server connection
  HELLO                               - Get server information
  HEALTH                              - Check that the store is usable
  POST <lat> <lon> <secs> <content>   - Drop a post that lives for 1..3599 seconds
  NEARBY <lat> <lon> <radius_km>      - List live posts within radius_km
  STATS                               - Show store counters
  QUIT                                - Close connection and exit
  HELP                                - Show this help message

Use Ctrl+D to exit interactive mode.
"#;
        help.trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;

    #[test]
    fn test_format_simple_string() {
        let value = RespValue::SimpleString("PONG".to_string());
        let result = OutputFormatter::format_response(&value);
        // 测试时不检查颜色代码，只检查内容
        assert!(result.contains("PONG"));
    }

    #[test]
    fn test_format_bulk_string() {
        let value = RespValue::BulkString(Some("hello".to_string()));
        let result = OutputFormatter::format_response(&value);
        assert!(result.contains("hello"));

        let value = RespValue::BulkString(None);
        let result = OutputFormatter::format_response(&value);
        assert!(result.contains("nil"));
    }

    #[test]
    fn test_format_integer() {
        let value = RespValue::Integer(42);
        let result = OutputFormatter::format_response(&value);
        assert!(result.contains("42"));
        assert!(result.contains("integer"));
    }

    #[test]
    fn test_format_post() {
        let post = Post::new(Coordinate::new(10.5, -3.25), "coffee here", 120)
            .unwrap()
            .with_created_at(1_000);
        let line = OutputFormatter::format_post(&post, 1_020);

        assert!(line.contains(&post.id.to_string()));
        assert!(line.contains("(10.5, -3.25)"));
        assert!(line.contains("coffee here"));
        assert!(line.contains("expires in 100s"));
    }

    #[test]
    fn test_format_posts_response() {
        let post = Post::new(Coordinate::new(1.0, 2.0), "lost cat", 60).unwrap();
        let json = serde_json::to_string(&post).unwrap();

        let single = RespValue::BulkString(Some(json.clone()));
        assert!(OutputFormatter::format_posts_response(&single).contains("lost cat"));

        let list = RespValue::Array(Some(vec![
            RespValue::BulkString(Some(json.clone())),
            RespValue::BulkString(Some(json)),
        ]));
        assert_eq!(
            OutputFormatter::format_posts_response(&list).lines().count(),
            2
        );

        let empty = RespValue::Array(Some(vec![]));
        assert!(OutputFormatter::format_posts_response(&empty).contains("no posts"));

        // 非帖子回复保持原样
        let pong = RespValue::SimpleString("PONG".to_string());
        assert!(OutputFormatter::format_posts_response(&pong).contains("PONG"));
    }
}
