use async_trait::async_trait;
use utoipa::ToSchema;

pub mod api;
#[path = "bootstrap/app_bootstrap.rs"]
pub mod app_bootstrap;
#[path = "bootstrap/command_registry.rs"]
pub mod command_registry;
#[path = "bootstrap/route_registry.rs"]
pub mod route_registry;
pub mod comm;
pub mod conf;
pub mod db;
pub mod error;
pub mod state;

// Modules
pub mod modules;

/// 健康状态：表示某组件当前的健康情况
/// Health status struct: represents the current health of a component
#[derive(Debug, serde::Serialize, ToSchema)]
pub struct HealthStatus {
    /// 组件名称（如 sqlite_pool）
    pub component: String,
    /// 是否健康
    pub healthy: bool,
    /// 附加消息（错误信息或提示）
    pub message: Option<String>,
    /// 采样时间戳（UTC）
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// 健康检查通用接口：由各服务或资源实现具体检查逻辑
/// Generic health check interface: implemented by services/resources with concrete logic
#[async_trait]
pub trait HealthCheck {
    /// 执行健康检查并返回健康状态
    async fn check_health(&self) -> HealthStatus;
}

/// 初始化所有模块的命令
pub fn init_commands() {
    modules::register_module_commands();
}

/// 初始化所有模块的路由
pub fn init_routes() {
    crate::register_route!("health", "Estado del servicio", "api", api::health::configure);
    modules::register_module_routes();
}

// Re-export bootstrap modules
pub use app_bootstrap::*;
pub use command_registry::*;
pub use route_registry::*;
