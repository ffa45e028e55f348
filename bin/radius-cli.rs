use std::io::{self, Write};

use radius::client::{CliArgs, ClientConnection, OutputFormatter};
use radius::protocol::RespValue;
use radius::Result;

fn main() -> Result<()> {
    let args = CliArgs::parse_args();

    // 验证参数
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    let mut connection = ClientConnection::new(&args.host, args.port);

    if args.should_run_interactive() {
        run_interactive_mode(&mut connection, &args.host, args.port, args.raw)?;
    } else {
        run_command_mode(&mut connection, &args.command, args.raw)?;
    }

    Ok(())
}

fn render(response: &RespValue, raw: bool) -> String {
    if raw {
        OutputFormatter::format_response(response)
    } else {
        OutputFormatter::format_posts_response(response)
    }
}

fn run_command_mode(connection: &mut ClientConnection, command: &[String], raw: bool) -> Result<()> {
    connection.connect()?;

    // 命令行参数已由 shell 切分，POST 的内容可能被拆成多个参数
    let command = normalize_command(command.to_vec());
    let response = connection.send_command(&command)?;
    println!("{}", render(&response, raw));

    connection.disconnect()?;

    if matches!(response, RespValue::Error(_)) {
        std::process::exit(1);
    }
    Ok(())
}

fn run_interactive_mode(
    connection: &mut ClientConnection,
    host: &str,
    port: u16,
    raw: bool,
) -> Result<()> {
    println!("radius-cli interactive mode");
    println!("{}", OutputFormatter::format_connecting_message(host, port));

    match connection.connect() {
        Ok(_) => println!("{}", OutputFormatter::format_connected_message(host, port)),
        Err(e) => {
            eprintln!("Failed to connect: {}", e);
            return Ok(());
        }
    }

    println!("Type 'HELP' for available commands, 'QUIT' to exit.");
    println!();

    let stdin = io::stdin();

    loop {
        print!("{}", OutputFormatter::format_prompt(host, port));
        io::stdout().flush()?;

        let mut input = String::new();
        match stdin.read_line(&mut input) {
            Ok(0) => {
                // EOF (Ctrl+D)
                println!();
                break;
            }
            Ok(_) => {
                let parts = parse_command_line(&input);
                if parts.is_empty() {
                    continue;
                }

                match parts[0].as_str() {
                    "QUIT" | "EXIT" => {
                        if let Ok(response) = connection.send_command(&["QUIT".to_string()]) {
                            println!("{}", OutputFormatter::format_response(&response));
                        }
                        break;
                    }
                    "HELP" => {
                        println!("{}", OutputFormatter::format_help_message());
                        continue;
                    }
                    _ => match connection.send_command(&parts) {
                        Ok(response) => println!("{}", render(&response, raw)),
                        Err(e) => {
                            eprintln!("Error: {}", e);
                            // 连接断开时尝试重连
                            if !connection.is_connected() {
                                println!("Connection lost. Attempting to reconnect...");
                                match connection.connect() {
                                    Ok(_) => println!(
                                        "{}",
                                        OutputFormatter::format_connected_message(host, port)
                                    ),
                                    Err(e) => {
                                        eprintln!("Failed to reconnect: {}", e);
                                        break;
                                    }
                                }
                            }
                        }
                    },
                }
            }
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                break;
            }
        }
    }

    println!("{}", OutputFormatter::format_disconnected_message());
    connection.disconnect()?;

    Ok(())
}

/// 切分交互输入。POST 的内容部分保持原样（去掉外层引号），其余命令按空白切分。
fn parse_command_line(input: &str) -> Vec<String> {
    let input = input.trim();
    if input.is_empty() {
        return Vec::new();
    }

    // 过滤控制字符
    let cleaned_input: String = input.chars().filter(|c| !c.is_control()).collect();

    let mut head = cleaned_input.splitn(2, char::is_whitespace);
    let command = head.next().unwrap_or_default().to_uppercase();
    let rest = head.next().unwrap_or_default().trim_start();

    if command == "POST" {
        // POST lat lon duration content...
        let mut parts = vec![command];
        let mut remaining = rest;
        for _ in 0..3 {
            let mut split = remaining.splitn(2, char::is_whitespace);
            match split.next() {
                Some(arg) if !arg.is_empty() => parts.push(arg.to_string()),
                _ => return parts,
            }
            remaining = split.next().unwrap_or_default().trim_start();
        }
        let content = remove_outer_quotes(remaining);
        if !content.is_empty() {
            parts.push(content.to_string());
        }
        return parts;
    }

    std::iter::once(command)
        .chain(rest.split_whitespace().map(|s| s.to_string()))
        .collect()
}

/// 命令模式下把 POST 的多个内容参数合并为一个
fn normalize_command(mut command: Vec<String>) -> Vec<String> {
    if let Some(first) = command.first_mut() {
        *first = first.to_uppercase();
    }
    if command.first().map(String::as_str) == Some("POST") && command.len() > 5 {
        let content = command.split_off(4).join(" ");
        command.push(content);
    }
    command
}

fn remove_outer_quotes(s: &str) -> &str {
    let s = s.trim();
    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        return &s[1..s.len() - 1];
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_post_keeps_content() {
        let parts = parse_command_line("post 52.52 13.40 600   free  books on the corner ");
        assert_eq!(
            parts,
            vec!["POST", "52.52", "13.40", "600", "free  books on the corner"]
        );

        let parts = parse_command_line(r#"POST 1 2 60 "quoted text""#);
        assert_eq!(parts, vec!["POST", "1", "2", "60", "quoted text"]);
    }

    #[test]
    fn test_parse_short_post() {
        // 参数不足时交给服务端报错
        assert_eq!(parse_command_line("POST 1 2"), vec!["POST", "1", "2"]);
    }

    #[test]
    fn test_parse_other_commands() {
        assert_eq!(
            parse_command_line("nearby -33.8 151.2  5"),
            vec!["NEARBY", "-33.8", "151.2", "5"]
        );
        assert!(parse_command_line("   ").is_empty());
    }

    #[test]
    fn test_normalize_command() {
        let cmd: Vec<String> = ["post", "1", "2", "60", "hello", "there"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(
            normalize_command(cmd),
            vec!["POST", "1", "2", "60", "hello there"]
        );
    }
}
