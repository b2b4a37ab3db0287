use actix_web::{web, HttpResponse, Result};
use serde::Serialize;
use utoipa::ToSchema;

use crate::state::AppState;
use crate::{HealthCheck, HealthStatus};

/// 健康检查响应模型
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// `healthy` 或 `unhealthy`
    pub status: String,
    pub version: String,
    pub components: Vec<HealthStatus>,
}

/// 健康检查：验证数据库连接
#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses(
        (status = 200, description = "Servicio operativo", body = HealthResponse),
        (status = 503, description = "Base de datos no disponible", body = HealthResponse)
    )
)]
pub async fn health(state: web::Data<AppState>) -> Result<HttpResponse> {
    let db = state.pool.check_health().await;
    let healthy = db.healthy;
    if !healthy {
        tracing::warn!("[health] {}: {:?}", db.component, db.message);
    }
    let body = HealthResponse {
        status: if healthy { "healthy" } else { "unhealthy" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        components: vec![db],
    };
    Ok(if healthy {
        HttpResponse::Ok().json(body)
    } else {
        HttpResponse::ServiceUnavailable().json(body)
    })
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/api/health", web::get().to(health));
}
