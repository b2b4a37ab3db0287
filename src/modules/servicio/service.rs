use sqlx::SqlitePool;
use validator::Validate;

use super::models::{CreateServicio, Servicio, ServicioFilter, UpdateServicio};
use super::repo;
use crate::error::{AppError, AppResult};
use crate::modules::audit_log::{self, Accion};
use crate::state::Actor;

pub async fn obtener(pool: &SqlitePool, id: i64) -> AppResult<Servicio> {
    repo::find(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Servicio"))
}

pub async fn listar(pool: &SqlitePool, filter: &ServicioFilter) -> AppResult<Vec<Servicio>> {
    Ok(repo::list(pool, filter).await?)
}

pub async fn crear(pool: &SqlitePool, actor: Actor, dto: CreateServicio) -> AppResult<Servicio> {
    dto.validate()?;
    let id = repo::insert(pool, &dto).await?;
    let servicio = obtener(pool, id).await?;
    audit_log::registrar(pool, actor, Accion::Crear, &servicio).await;
    Ok(servicio)
}

pub async fn actualizar(
    pool: &SqlitePool,
    actor: Actor,
    id: i64,
    patch: UpdateServicio,
) -> AppResult<Servicio> {
    patch.validate()?;
    let mut servicio = obtener(pool, id).await?;
    patch.apply(&mut servicio);
    servicio.updated_at = crate::db::now();
    repo::update(pool, &servicio).await?;
    audit_log::registrar(pool, actor, Accion::Actualizar, &servicio).await;
    Ok(servicio)
}

/// 停用服务：历史预约仍可引用
pub async fn eliminar(pool: &SqlitePool, actor: Actor, id: i64) -> AppResult<Servicio> {
    let mut servicio = obtener(pool, id).await?;
    servicio.activo = false;
    servicio.updated_at = crate::db::now();
    repo::update(pool, &servicio).await?;
    audit_log::registrar(pool, actor, Accion::Eliminar, &servicio).await;
    Ok(servicio)
}
