use sqlx::SqlitePool;
use validator::Validate;

use super::models::{Cliente, ClienteFilter, CreateCliente, UpdateCliente};
use super::repo;
use crate::error::{AppError, AppResult};
use crate::modules::audit_log::{self, Accion};
use crate::modules::cita::{self, models::CitaDetalle};
use crate::state::Actor;

pub async fn obtener(pool: &SqlitePool, id: i64) -> AppResult<Cliente> {
    repo::find(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Cliente"))
}

pub async fn listar(pool: &SqlitePool, filter: &ClienteFilter) -> AppResult<Vec<Cliente>> {
    Ok(repo::list(pool, filter).await?)
}

pub async fn crear(pool: &SqlitePool, actor: Actor, dto: CreateCliente) -> AppResult<Cliente> {
    dto.validate()?;
    let id = repo::insert(pool, &dto).await?;
    let cliente = obtener(pool, id).await?;
    audit_log::registrar(pool, actor, Accion::Crear, &cliente).await;
    Ok(cliente)
}

pub async fn actualizar(
    pool: &SqlitePool,
    actor: Actor,
    id: i64,
    patch: UpdateCliente,
) -> AppResult<Cliente> {
    patch.validate()?;
    let mut cliente = obtener(pool, id).await?;
    patch.apply(&mut cliente);
    cliente.updated_at = crate::db::now();
    repo::update(pool, &cliente).await?;
    audit_log::registrar(pool, actor, Accion::Actualizar, &cliente).await;
    Ok(cliente)
}

/// 软删除：仅标记为停用 / Soft delete
pub async fn eliminar(pool: &SqlitePool, actor: Actor, id: i64) -> AppResult<Cliente> {
    let mut cliente = obtener(pool, id).await?;
    cliente.activo = false;
    cliente.updated_at = crate::db::now();
    repo::update(pool, &cliente).await?;
    audit_log::registrar(pool, actor, Accion::Eliminar, &cliente).await;
    Ok(cliente)
}

/// 客户预约历史（最新在前）
pub async fn historial(pool: &SqlitePool, id: i64) -> AppResult<Vec<CitaDetalle>> {
    obtener(pool, id).await?;
    cita::service::historial_cliente(pool, id).await
}
