use actix_web::{get, patch, web, HttpResponse, Result};

use super::models::{Configuracion, UpdateConfiguracion};
use super::service;
use crate::state::{Actor, AppState};

/// 获取营业配置
#[utoipa::path(
    get,
    path = "/api/configuracion",
    tag = "Configuracion",
    responses((status = 200, body = Configuracion))
)]
#[get("")]
pub async fn obtener(state: web::Data<AppState>) -> Result<HttpResponse> {
    let c = service::obtener(&state.pool).await?;
    Ok(HttpResponse::Ok().json(c))
}

/// 更新营业配置
#[utoipa::path(
    patch,
    path = "/api/configuracion",
    tag = "Configuracion",
    request_body = UpdateConfiguracion,
    responses(
        (status = 200, body = Configuracion),
        (status = 400, description = "Datos inválidos")
    )
)]
#[patch("")]
pub async fn actualizar(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<UpdateConfiguracion>,
) -> Result<HttpResponse> {
    let c = service::actualizar(&state.pool, actor, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(c))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/configuracion")
            .service(obtener)
            .service(actualizar),
    );
}
