use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::index::MAX_SEARCH_RINGS;
use crate::storage::StoreBackend;

/// Radius 服务配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadiusConfig {
    /// 服务器配置
    pub server: ServerConfig,

    /// 存储配置
    pub storage: StorageConfig,

    /// 日志配置
    pub logging: LoggingConfig,
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,

    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
}

/// 存储配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// 存储后端：indexed, memory
    #[serde(default = "default_backend")]
    pub backend: String,

    /// 网格搜索环数，1 表示 3×3 邻域
    #[serde(default = "default_search_rings")]
    pub search_rings: u32,

    /// 后台过期清理间隔（秒），0 表示只在访问时清理
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// 日志级别：trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 日志输出：stdout, file
    #[serde(default = "default_log_output")]
    pub output: String,

    /// 日志文件路径（当 output = file 时）
    pub log_file: Option<PathBuf>,
}

// ============================================================================
// 默认值函数
// ============================================================================

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    7070
}

fn default_backend() -> String {
    "indexed".to_string()
}

fn default_search_rings() -> u32 {
    crate::index::DEFAULT_SEARCH_RINGS
}

fn default_sweep_interval() -> u64 {
    0
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_output() -> String {
    "stdout".to_string()
}

// ============================================================================
// 实现
// ============================================================================

impl Default for RadiusConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: default_host(),
                port: default_port(),
            },
            storage: StorageConfig {
                backend: default_backend(),
                search_rings: default_search_rings(),
                sweep_interval_secs: default_sweep_interval(),
            },
            logging: LoggingConfig {
                level: default_log_level(),
                output: default_log_output(),
                log_file: None,
            },
        }
    }
}

impl RadiusConfig {
    /// 从文件加载配置
    ///
    /// 配置加载顺序（优先级从低到高）：
    /// 1. 默认配置（内嵌的 default.toml）
    /// 2. 用户配置文件（可选）
    /// 3. 环境变量（RADIUS__ 前缀，使用双下划线分隔嵌套）
    ///
    /// # 示例
    ///
    /// ```no_run
    /// use radius::config::RadiusConfig;
    ///
    /// let config = RadiusConfig::from_file("radius.toml").unwrap();
    /// ```
    pub fn from_file(path: &str) -> crate::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from_str(
                include_str!("default.toml"),
                config::FileFormat::Toml,
            ))
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("RADIUS").separator("__"))
            .build()
            .map_err(|e| format!("Failed to load config: {}", e))?;

        Ok(settings
            .try_deserialize()
            .map_err(|e| format!("Failed to parse config: {}", e))?)
    }

    /// 保存配置到文件
    pub fn save_to_file(&self, path: &str) -> crate::Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;
        std::fs::write(path, toml_string)
            .map_err(|e| format!("Failed to write config file: {}", e))?;
        Ok(())
    }

    /// 解析后的存储后端
    pub fn backend(&self) -> Result<StoreBackend, String> {
        self.storage.backend.parse()
    }

    /// 验证配置
    ///
    /// 检查端口、存储后端、搜索环数、日志级别和日志文件配置
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }

        self.backend()?;

        if self.storage.search_rings == 0 || self.storage.search_rings > MAX_SEARCH_RINGS {
            return Err(format!(
                "Invalid search_rings: {}. Must be between 1 and {}",
                self.storage.search_rings, MAX_SEARCH_RINGS
            ));
        }

        match self.logging.level.as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            _ => {
                return Err(format!(
                    "Invalid log level: '{}'. Must be one of: trace, debug, info, warn, error",
                    self.logging.level
                ))
            }
        }

        match self.logging.output.as_str() {
            "stdout" => {}
            "file" if self.logging.log_file.is_none() => {
                return Err("Log output is 'file' but log_file path is not specified".to_string());
            }
            "file" => {}
            other => {
                return Err(format!(
                    "Invalid log output: '{}'. Must be one of: stdout, file",
                    other
                ))
            }
        }

        Ok(())
    }

    /// 打印配置摘要
    pub fn print_summary(&self) {
        println!("📋 Radius Configuration:");
        println!("   Server:        {}:{}", self.server.host, self.server.port);
        println!();
        println!("   Backend:       {}", self.storage.backend);
        println!(
            "   Search Grid:   {0}x{0} cells",
            self.storage.search_rings * 2 + 1
        );
        if self.storage.sweep_interval_secs > 0 {
            println!(
                "   Sweep:         every {} seconds + on access",
                self.storage.sweep_interval_secs
            );
        } else {
            println!("   Sweep:         on access");
        }
        println!();
        println!("   Log Level:     {}", self.logging.level);
        println!("   Log Output:    {}", self.logging.output);
        if let Some(ref log_file) = self.logging.log_file {
            println!("   Log File:      {}", log_file.display());
        }
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RadiusConfig::default();
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 7070);
        assert_eq!(config.backend(), Ok(StoreBackend::Indexed));
        assert_eq!(config.storage.search_rings, 1);
        assert_eq!(config.storage.sweep_interval_secs, 0);
    }

    #[test]
    fn test_config_validation() {
        let mut config = RadiusConfig::default();
        assert!(config.validate().is_ok());

        // 无效端口
        config.server.port = 0;
        assert!(config.validate().is_err());
        config.server.port = 7070;

        // 无效后端
        config.storage.backend = "sqlite".to_string();
        assert!(config.validate().is_err());
        config.storage.backend = "memory".to_string();
        assert!(config.validate().is_ok());

        // 无效搜索环数
        config.storage.search_rings = 0;
        assert!(config.validate().is_err());
        config.storage.search_rings = 1;

        // 无效日志级别
        config.logging.level = "invalid".to_string();
        assert!(config.validate().is_err());
        config.logging.level = "debug".to_string();

        // 文件输出但没有路径
        config.logging.output = "file".to_string();
        assert!(config.validate().is_err());
        config.logging.log_file = Some(PathBuf::from("./logs/radius.log"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_load() {
        use tempfile::NamedTempFile;

        let mut config = RadiusConfig::default();
        config.server.port = 9999;
        config.storage.backend = "memory".to_string();

        let temp_file = NamedTempFile::new().unwrap();
        let path = temp_file.path().to_str().unwrap();

        config.save_to_file(path).unwrap();

        // config crate 按扩展名识别格式，临时文件没有扩展名时显式指定
        let loaded: RadiusConfig = config::Config::builder()
            .add_source(config::File::new(path, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(loaded.server.port, 9999);
        assert_eq!(loaded.storage.backend, "memory");
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let loaded = RadiusConfig::from_file("does-not-exist-radius.toml").unwrap();
        assert_eq!(loaded.storage.backend, "indexed");
        assert_eq!(loaded.logging.level, "info");
    }
}
