use std::collections::HashMap;

use actix_web::{middleware::Logger, web, App, HttpServer};
use tracing::{error, info, instrument};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::comm::config::{
    get_global_config_manager, set_global_config_manager, ConfigManager, ConfigSource,
};
use crate::comm::tracing::init_tracing;
use crate::conf::AppConfiguration;
use crate::error::{json_error_handler, path_error_handler, query_error_handler, AppError, AppResult};
use crate::route_registry::{configure_all, get_global_route_registry};
use crate::state::AppState;

/// 应用启动器
///
/// 命令行参数通过 [`with_host`](Self::with_host) 等方法注入，优先级高于配置文件与环境变量。
#[derive(Debug, Default)]
pub struct AppBootstrap {
    overrides: HashMap<String, serde_json::Value>,
}

impl AppBootstrap {
    /// 创建新的应用启动器
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置主机地址
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.overrides
            .insert("server.host".to_string(), serde_json::Value::from(host.into()));
        self
    }

    /// 设置端口
    pub fn with_port(mut self, port: u16) -> Self {
        self.overrides
            .insert("server.port".to_string(), serde_json::Value::from(port));
        self
    }

    /// 设置工作线程数
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.overrides
            .insert("server.workers".to_string(), serde_json::Value::from(workers));
        self
    }

    /// 加载配置；存在命令行覆盖时替换全局配置管理器
    fn load_configuration(&self) -> AppResult<AppConfiguration> {
        let manager = if self.overrides.is_empty() {
            get_global_config_manager()?
        } else {
            let manager =
                ConfigManager::with_sources(vec![ConfigSource::Memory(self.overrides.clone())])?;
            set_global_config_manager(manager)?
        };
        AppConfiguration::load(&manager)
    }

    /// 运行应用服务器
    #[instrument(skip(self))]
    pub async fn run(self) -> AppResult<()> {
        let config = self.load_configuration()?;
        init_tracing(&config.logging)?;
        get_global_config_manager()?.log_sources_info();
        info!(
            "启动应用服务器 host={} port={} workers={:?}",
            config.server.host, config.server.port, config.server.workers
        );

        let state = build_state(config).await?;
        match start_http_server(state).await {
            Ok(()) => {
                info!("服务器已停止");
                Ok(())
            }
            Err(e) => {
                error!("服务器启动失败: {}", e);
                Err(e)
            }
        }
    }
}

/// 打开连接池并完成建表与默认配置写入
async fn build_state(config: AppConfiguration) -> AppResult<AppState> {
    let pool = crate::db::connect(&config.database).await?;
    let state = AppState::new(pool, config);
    state.prepare().await?;
    Ok(state)
}

/// 命令行子命令使用的应用状态（不启动 HTTP 服务）
pub async fn open_state() -> AppResult<AppState> {
    let config = AppConfiguration::load(&*get_global_config_manager()?)?;
    init_tracing(&config.logging)?;
    build_state(config).await
}

/// 执行数据库迁移
pub async fn migrate() -> AppResult<()> {
    let state = open_state().await?;
    info!("[db] 迁移完成: {}", state.config.database.url);
    state.pool.close().await;
    Ok(())
}

/// 启动HTTP服务器
async fn start_http_server(state: AppState) -> AppResult<()> {
    let bind = format!("{}:{}", state.config.server.host, state.config.server.port);
    let workers = state.config.server.workers;
    let data = web::Data::new(state);
    let openapi = crate::api::swagger::ApiDoc::openapi();

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(data.clone())
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .app_data(web::QueryConfig::default().error_handler(query_error_handler))
            .app_data(web::PathConfig::default().error_handler(path_error_handler))
            // 集成 Swagger UI 文档（使用通配路径以兼容静态资源与尾随斜杠）
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-doc/openapi.json", openapi.clone()),
            )
            .configure(configure_all)
    });
    if let Some(workers) = workers {
        server = server.workers(workers);
    }

    let server = server
        .bind(&bind)
        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;
    get_global_route_registry().log_routes_info();
    info!("服务器监听 {}", bind);

    server
        .run()
        .await
        .map_err(|e| AppError::Internal(anyhow::Error::new(e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_are_collected() {
        let boot = AppBootstrap::new()
            .with_host("127.0.0.1")
            .with_port(8088)
            .with_workers(2);
        assert_eq!(boot.overrides["server.host"], "127.0.0.1");
        assert_eq!(boot.overrides["server.port"], 8088);
        assert_eq!(boot.overrides["server.workers"], 2);
    }
}
