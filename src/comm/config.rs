use anyhow::{anyhow, Result};
use config::{Config, ConfigBuilder, Environment, File, FileFormat};
use lazy_static::lazy_static;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

lazy_static! {
    static ref GLOBAL_CONFIG_MANAGER: RwLock<Option<Arc<ConfigManager>>> = RwLock::new(None);
}

/// 环境变量前缀 / Environment variable prefix (`SALON_SERVER_PORT` -> `server.port`)
pub const ENV_PREFIX: &str = "SALON";

/// 配置错误类型
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("配置项 '{key}' 无效: {message}")]
    Invalid { key: String, message: String },
    #[error("配置初始化失败: {message}")]
    InitializationError { message: String },
}

/// 配置数据源信息
#[derive(Debug, Clone)]
pub struct ConfigSourceInfo {
    pub source_type: String,
    pub description: String,
    pub priority: u8,
    pub loaded: bool,
}

/// 配置管理器
pub struct ConfigManager {
    config: Config,
    sources_info: Vec<ConfigSourceInfo>,
}

impl ConfigManager {
    /// 创建配置管理器（默认配置源）
    pub fn new() -> Result<Self> {
        Self::with_sources(vec![])
    }

    /// 使用指定的配置源创建配置管理器
    ///
    /// 默认配置源按优先级从低到高添加，后添加者优先生效：
    /// development.toml -> default.toml -> production.toml -> 环境变量 -> `sources`
    pub fn with_sources(sources: Vec<ConfigSource>) -> Result<Self> {
        let default_sources = vec![
            ConfigSource::File {
                path: "config/development.toml".to_string(),
                format: Some(FileFormat::Toml),
                required: false,
            },
            ConfigSource::File {
                path: "config/default.toml".to_string(),
                format: Some(FileFormat::Toml),
                required: false,
            },
            ConfigSource::File {
                path: "config/production.toml".to_string(),
                format: Some(FileFormat::Toml),
                required: false,
            },
            ConfigSource::Env {
                prefix: ENV_PREFIX.to_string(),
                separator: "_",
            },
        ];
        Self::build(default_sources.into_iter().chain(sources))
    }

    /// 仅使用给定配置源（不读取文件与环境变量），测试与命令行覆盖使用
    pub fn isolated(sources: Vec<ConfigSource>) -> Result<Self> {
        Self::build(sources.into_iter())
    }

    fn build(sources: impl Iterator<Item = ConfigSource>) -> Result<Self> {
        let mut builder = Config::builder();
        let mut sources_info = Vec::new();

        for (index, source) in sources.enumerate() {
            let priority = u8::try_from(index + 1).unwrap_or(u8::MAX);
            let info = source.get_source_info(priority);

            if let ConfigSource::File { path, required, .. } = &source {
                let exists = std::path::Path::new(path).exists();
                if !exists && *required {
                    return Err(anyhow!("必需的配置文件不存在: {}", path));
                }
                if !exists {
                    // 可选文件不存在，记录但不添加
                    sources_info.push(info);
                    continue;
                }
            }

            builder = source
                .add_to_builder(builder)
                .map_err(|e| anyhow!("添加配置源失败: {}", e))?;
            sources_info.push(ConfigSourceInfo {
                loaded: true,
                ..info
            });
        }

        let config = builder
            .build()
            .map_err(|e| anyhow!("构建配置失败: {}", e))?;
        Ok(Self {
            config,
            sources_info,
        })
    }

    /// 获取指定 key 的配置值
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<T> {
        self.config
            .get(key)
            .map_err(|e| anyhow!("获取配置 '{}' 失败: {}", key, e))
    }

    /// 获取字符串配置值
    pub fn get_string(&self, key: &str) -> Result<String> {
        self.get(key)
    }

    /// 配置源统计 (总计, 已加载, 未加载)
    pub fn get_sources_stats(&self) -> (usize, usize, usize) {
        let total = self.sources_info.len();
        let loaded = self.sources_info.iter().filter(|info| info.loaded).count();
        (total, loaded, total - loaded)
    }

    /// 记录配置源详细信息
    pub fn log_sources_info(&self) {
        for info in &self.sources_info {
            tracing::debug!(
                priority = info.priority,
                loaded = info.loaded,
                "{}: {}",
                info.source_type,
                info.description
            );
        }
        let (total, loaded, skipped) = self.get_sources_stats();
        tracing::info!(
            "配置源: 总计 {} 个，已加载 {} 个，跳过 {} 个",
            total,
            loaded,
            skipped
        );
    }
}

/// 配置源类型
pub enum ConfigSource {
    /// 文件配置源
    File {
        path: String,
        format: Option<FileFormat>,
        required: bool,
    },
    /// 环境变量配置源
    Env {
        prefix: String,
        separator: &'static str,
    },
    /// 内存配置源
    Memory(HashMap<String, serde_json::Value>),
    /// 字符串配置源
    String { content: String, format: FileFormat },
}

impl ConfigSource {
    /// 获取配置源信息
    pub fn get_source_info(&self, priority: u8) -> ConfigSourceInfo {
        let (source_type, description) = match self {
            ConfigSource::File { path, required, .. } => (
                "File",
                format!("文件配置源: {} (必需: {})", path, required),
            ),
            ConfigSource::Env { prefix, separator } => (
                "Environment",
                format!("环境变量配置源: 前缀={}, 分隔符={}", prefix, separator),
            ),
            ConfigSource::Memory(map) => ("Memory", format!("内存配置源: {} 个配置项", map.len())),
            ConfigSource::String { .. } => ("String", "字符串配置源".to_string()),
        };
        ConfigSourceInfo {
            source_type: source_type.to_string(),
            description,
            priority,
            loaded: false,
        }
    }

    pub fn add_to_builder(
        self,
        builder: ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<ConfigBuilder<config::builder::DefaultState>> {
        match self {
            ConfigSource::File {
                path,
                format,
                required,
            } => {
                let file_source = match format {
                    Some(format) => File::with_name(&path).format(format),
                    None => File::with_name(&path),
                };
                Ok(builder.add_source(file_source.required(required)))
            }
            ConfigSource::Env { prefix, separator } => Ok(builder.add_source(
                Environment::with_prefix(&prefix)
                    .separator(separator)
                    .prefix_separator("_")
                    .try_parsing(true)
                    .ignore_empty(true),
            )),
            ConfigSource::Memory(map) => {
                let mut builder = builder;
                for (key, value) in map {
                    builder = builder
                        .set_override(key.as_str(), json_to_config_value(value))
                        .map_err(|e| anyhow!("内存配置项 '{}' 无效: {}", key, e))?;
                }
                Ok(builder)
            }
            ConfigSource::String { content, format } => {
                Ok(builder.add_source(File::from_str(&content, format)))
            }
        }
    }
}

fn json_to_config_value(value: serde_json::Value) -> config::Value {
    use config::ValueKind;
    let kind = match value {
        serde_json::Value::Null => ValueKind::Nil,
        serde_json::Value::Bool(b) => ValueKind::Boolean(b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => ValueKind::I64(i),
            None => ValueKind::Float(n.as_f64().unwrap_or_default()),
        },
        serde_json::Value::String(s) => ValueKind::String(s),
        serde_json::Value::Array(items) => {
            ValueKind::Array(items.into_iter().map(json_to_config_value).collect())
        }
        serde_json::Value::Object(map) => ValueKind::Table(
            map.into_iter()
                .map(|(k, v)| (k, json_to_config_value(v)))
                .collect(),
        ),
    };
    config::Value::new(None, kind)
}

/// 获取全局配置管理器实例（单例模式）
pub fn get_global_config_manager() -> Result<Arc<ConfigManager>> {
    {
        let manager = GLOBAL_CONFIG_MANAGER
            .read()
            .map_err(|e| anyhow!("读取全局配置管理器锁失败: {}", e))?;
        if let Some(ref config_manager) = *manager {
            return Ok(Arc::clone(config_manager));
        }
    }
    let mut manager = GLOBAL_CONFIG_MANAGER
        .write()
        .map_err(|e| anyhow!("获取全局配置管理器写锁失败: {}", e))?;
    match manager.as_ref() {
        Some(existing) => Ok(Arc::clone(existing)),
        None => {
            let config_manager =
                Arc::new(ConfigManager::new().map_err(|e| anyhow!("创建配置管理器失败: {}", e))?);
            *manager = Some(Arc::clone(&config_manager));
            Ok(config_manager)
        }
    }
}

/// 替换全局配置管理器（命令行参数覆盖时使用）
pub fn set_global_config_manager(config_manager: ConfigManager) -> Result<Arc<ConfigManager>> {
    let config_manager = Arc::new(config_manager);
    let mut manager = GLOBAL_CONFIG_MANAGER
        .write()
        .map_err(|e| anyhow!("获取全局配置管理器写锁失败: {}", e))?;
    *manager = Some(Arc::clone(&config_manager));
    Ok(config_manager)
}

#[cfg(test)]
mod tests {
    use super::{ConfigManager, ConfigSource};
    use config::FileFormat;
    use std::collections::HashMap;

    #[test]
    fn test_config_from_string() {
        let source = ConfigSource::String {
            content: "[server]\nport = 8080\n[agenda]\nintervalo = 15".to_string(),
            format: FileFormat::Toml,
        };
        let manager = ConfigManager::isolated(vec![source]).unwrap();
        assert_eq!(manager.get::<i64>("server.port").unwrap(), 8080);
        assert_eq!(manager.get::<u32>("agenda.intervalo").unwrap(), 15);
    }

    #[test]
    fn test_memory_overrides_string() {
        let base = ConfigSource::String {
            content: "[server]\nhost = \"0.0.0.0\"".to_string(),
            format: FileFormat::Toml,
        };
        let mut map = HashMap::new();
        map.insert(
            "server.host".to_string(),
            serde_json::Value::String("127.0.0.1".to_string()),
        );
        let manager = ConfigManager::isolated(vec![base, ConfigSource::Memory(map)]).unwrap();
        assert_eq!(manager.get::<String>("server.host").unwrap(), "127.0.0.1");
    }

    #[test]
    fn test_missing_optional_file_is_skipped() {
        let source = ConfigSource::File {
            path: "config/no-existe.toml".to_string(),
            format: Some(FileFormat::Toml),
            required: false,
        };
        let manager = ConfigManager::isolated(vec![source]).unwrap();
        assert_eq!(manager.get_sources_stats(), (1, 0, 1));
        assert!(manager.get::<i64>("server.port").is_err());
    }

    #[test]
    fn test_missing_required_file_fails() {
        let source = ConfigSource::File {
            path: "config/no-existe.toml".to_string(),
            format: Some(FileFormat::Toml),
            required: true,
        };
        assert!(ConfigManager::isolated(vec![source]).is_err());
    }
}
