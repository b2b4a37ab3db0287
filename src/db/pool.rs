use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::conf::DatabaseConfig;
use crate::error::{AppError, AppResult};
use crate::{HealthCheck, HealthStatus};

/// 根据配置构建 SQLite 连接池 / Build the SQLite pool from configuration
///
/// 读取 `database.url` 与 `database.pool`；外键约束始终开启。
pub async fn connect(cfg: &DatabaseConfig) -> AppResult<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&cfg.url)
        .map_err(|e| AppError::database(format!("database.url inválida: {}", e)))?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_secs(5));

    // 内存库每个连接都是独立数据库，只能使用单连接
    let max = if is_memory_url(&cfg.url) { 1 } else { cfg.pool };

    let pool = SqlitePoolOptions::new()
        .max_connections(max)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .idle_timeout(None::<Duration>)
        .max_lifetime(None::<Duration>)
        .connect_with(options)
        .await?;

    tracing::info!("[db] sqlite pool initialized url={} maxOpen={}", cfg.url, max);
    Ok(pool)
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

/// 健康检查 / Health check
///
/// 执行 `SELECT 1` 验证连接可用
pub async fn check_health(pool: &SqlitePool) -> AppResult<()> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

#[async_trait]
impl HealthCheck for SqlitePool {
    async fn check_health(&self) -> HealthStatus {
        let res = check_health(self).await;
        HealthStatus {
            component: "sqlite_pool".to_string(),
            healthy: res.is_ok(),
            message: Some(match res {
                Ok(()) => "OK".to_string(),
                Err(e) => e.to_string(),
            }),
            timestamp: chrono::Utc::now(),
        }
    }
}
