/// 通用模块
/// Common helpers: configuration, logging, time, patch and response utilities

pub mod config;
pub mod patch;
pub mod response;
pub mod time;
pub mod tracing;

pub use config::{get_global_config_manager, ConfigManager, ConfigSource};
