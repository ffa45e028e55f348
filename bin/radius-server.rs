use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use radius::server::{spawn_sweeper, TcpServer};
use radius::{open_store, RadiusConfig, Result};
use tracing::{error, info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// 配置文件路径
    #[arg(short, long, default_value = "radius.toml")]
    config: String,

    /// 生成默认配置文件并退出
    #[arg(long)]
    generate_config: bool,

    /// Host to bind to (overrides config file)
    #[arg(long, env = "HOST")]
    host: Option<String>,

    /// Port to bind to (overrides config file)
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Log level (overrides config file)
    #[arg(long)]
    log_level: Option<String>,

    /// Storage backend: indexed or memory (overrides config file)
    #[arg(long)]
    backend: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 生成默认配置文件
    if args.generate_config {
        let config = RadiusConfig::default();
        config.save_to_file(&args.config)?;
        println!("✅ Generated default configuration: {}", args.config);
        println!("📝 You can edit this file and restart the server.");
        return Ok(());
    }

    // 加载配置
    let mut config = RadiusConfig::from_file(&args.config)?;

    // 命令行参数覆盖配置文件
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(log_level) = args.log_level {
        config.logging.level = log_level;
    }
    if let Some(backend) = args.backend {
        config.storage.backend = backend;
    }

    // 验证配置
    config.validate()?;

    // 初始化日志系统
    init_logging(&config.logging)?;

    info!("🚀 Starting Radius server...");
    info!("📦 Version: {}", env!("CARGO_PKG_VERSION"));
    println!();

    // 打印配置摘要
    config.print_summary();

    let store = open_store(config.backend()?, config.storage.search_rings);
    info!("🗂️  Using {} store", config.storage.backend);

    let sweeper = match config.storage.sweep_interval_secs {
        0 => None,
        secs => Some(spawn_sweeper(
            Arc::clone(&store),
            Duration::from_secs(secs),
        )),
    };

    let server = TcpServer::new(config, store);

    tokio::select! {
        result = server.start() => {
            if let Err(e) = result {
                error!("Server error: {}", e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("🛑 Received shutdown signal");
        }
    }

    if let Err(e) = server.shutdown() {
        error!("Failed to close store: {}", e);
    }
    if let Some(handle) = sweeper {
        handle.abort();
    }
    info!("👋 Bye");

    Ok(())
}

/// 初始化日志系统
fn init_logging(config: &radius::config::LoggingConfig) -> Result<()> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = match config.level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    match (config.output.as_str(), &config.log_file) {
        ("file", Some(log_file)) => {
            // 确保日志目录存在
            if let Some(parent) = log_file.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_file)?;

            tracing_subscriber::registry()
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(std::sync::Mutex::new(file))
                        .with_ansi(false)
                        .with_target(false),
                )
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .with(tracing_subscriber::filter::LevelFilter::from_level(filter))
                .init();
        }
    }

    Ok(())
}
