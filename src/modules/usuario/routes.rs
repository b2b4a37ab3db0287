use actix_web::{delete, get, patch, post, web, HttpResponse, Result};

use super::models::{CreateUsuario, UpdateUsuario, Usuario, UsuarioFilter};
use super::service;
use crate::state::{Actor, AppState};

#[utoipa::path(
    get,
    path = "/api/usuarios",
    tag = "Usuarios",
    params(UsuarioFilter),
    responses((status = 200, body = [Usuario]))
)]
#[get("")]
pub async fn listar(
    state: web::Data<AppState>,
    filter: web::Query<UsuarioFilter>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service::listar(&state.pool, &filter).await?))
}

#[utoipa::path(
    post,
    path = "/api/usuarios",
    tag = "Usuarios",
    request_body = CreateUsuario,
    responses(
        (status = 201, body = Usuario),
        (status = 400),
        (status = 409, description = "Email duplicado")
    )
)]
#[post("")]
pub async fn crear(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<CreateUsuario>,
) -> Result<HttpResponse> {
    let usuario = service::crear(&state.pool, actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(usuario))
}

#[utoipa::path(
    get,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = i64, Path)),
    responses((status = 200, body = Usuario), (status = 404))
)]
#[get("/{id}")]
pub async fn obtener(state: web::Data<AppState>, id: web::Path<i64>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service::obtener(&state.pool, id.into_inner()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = i64, Path)),
    request_body = UpdateUsuario,
    responses((status = 200, body = Usuario), (status = 404), (status = 409))
)]
#[patch("/{id}")]
pub async fn actualizar(
    state: web::Data<AppState>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<UpdateUsuario>,
) -> Result<HttpResponse> {
    let usuario =
        service::actualizar(&state.pool, actor, id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(usuario))
}

#[utoipa::path(
    delete,
    path = "/api/usuarios/{id}",
    tag = "Usuarios",
    params(("id" = i64, Path)),
    responses(
        (status = 200, body = Usuario),
        (status = 404),
        (status = 409, description = "Último administrador activo")
    )
)]
#[delete("/{id}")]
pub async fn eliminar(
    state: web::Data<AppState>,
    actor: Actor,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let usuario = service::eliminar(&state.pool, actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(usuario))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/usuarios")
            .service(listar)
            .service(crear)
            .service(obtener)
            .service(actualizar)
            .service(eliminar),
    );
}
