use actix_web::{delete, get, patch, post, web, HttpResponse, Result};

use super::models::{
    CitaDetalle, CitaFilter, CreateCita, Disponibilidad, DisponibilidadQuery, UpdateCita,
};
use super::service;
use crate::comm::response::{eliminado, Eliminado};
use crate::state::{Actor, AppState};

/// 预约列表
#[utoipa::path(
    get,
    path = "/api/citas",
    tag = "Citas",
    params(CitaFilter),
    responses((status = 200, body = [CitaDetalle]))
)]
#[get("")]
pub async fn listar(
    state: web::Data<AppState>,
    filter: web::Query<CitaFilter>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service::listar(&state.pool, &filter).await?))
}

/// 创建预约（检查时间段）
#[utoipa::path(
    post,
    path = "/api/citas",
    tag = "Citas",
    request_body = CreateCita,
    responses(
        (status = 201, body = CitaDetalle),
        (status = 400),
        (status = 404, description = "Cliente o servicio inexistente"),
        (status = 409, description = "Horario no disponible")
    )
)]
#[post("")]
pub async fn crear(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<CreateCita>,
) -> Result<HttpResponse> {
    let cita = service::crear(&state.pool, &state.config, actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(cita))
}

/// 时间段可用性
#[utoipa::path(
    get,
    path = "/api/citas/disponibilidad",
    tag = "Citas",
    params(DisponibilidadQuery),
    responses((status = 200, body = Disponibilidad), (status = 400), (status = 404))
)]
#[get("/disponibilidad")]
pub async fn disponibilidad(
    state: web::Data<AppState>,
    query: web::Query<DisponibilidadQuery>,
) -> Result<HttpResponse> {
    let d = service::disponibilidad(&state.pool, &state.config, &query).await?;
    Ok(HttpResponse::Ok().json(d))
}

#[utoipa::path(
    get,
    path = "/api/citas/{id}",
    tag = "Citas",
    params(("id" = i64, Path)),
    responses((status = 200, body = CitaDetalle), (status = 404))
)]
#[get("/{id}")]
pub async fn obtener(state: web::Data<AppState>, id: web::Path<i64>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service::obtener(&state.pool, id.into_inner()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/citas/{id}",
    tag = "Citas",
    params(("id" = i64, Path)),
    request_body = UpdateCita,
    responses((status = 200, body = CitaDetalle), (status = 404), (status = 409))
)]
#[patch("/{id}")]
pub async fn actualizar(
    state: web::Data<AppState>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<UpdateCita>,
) -> Result<HttpResponse> {
    let cita = service::actualizar(
        &state.pool,
        &state.config,
        actor,
        id.into_inner(),
        body.into_inner(),
    )
    .await?;
    Ok(HttpResponse::Ok().json(cita))
}

#[utoipa::path(
    delete,
    path = "/api/citas/{id}",
    tag = "Citas",
    params(("id" = i64, Path)),
    responses(
        (status = 200, body = Eliminado),
        (status = 404),
        (status = 409, description = "La cita tiene pagos")
    )
)]
#[delete("/{id}")]
pub async fn eliminar(
    state: web::Data<AppState>,
    actor: Actor,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    service::eliminar(&state.pool, actor, id.into_inner()).await?;
    Ok(eliminado())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/citas")
            .service(listar)
            .service(crear)
            .service(disponibilidad)
            .service(obtener)
            .service(actualizar)
            .service(eliminar),
    );
}
