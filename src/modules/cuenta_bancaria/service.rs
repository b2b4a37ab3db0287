use sqlx::SqlitePool;
use validator::Validate;

use super::models::{
    CreateCuentaBancaria, CuentaBancaria, CuentaBancariaDetalle, CuentaBancariaFilter,
    UpdateCuentaBancaria,
};
use super::repo;
use crate::error::{AppError, AppResult};
use crate::modules::audit_log::{self, Accion};
use crate::state::Actor;

async fn buscar(pool: &SqlitePool, id: i64) -> AppResult<CuentaBancaria> {
    repo::find(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Cuenta bancaria"))
}

pub async fn obtener(pool: &SqlitePool, id: i64) -> AppResult<CuentaBancariaDetalle> {
    let cuenta = buscar(pool, id).await?;
    let pagos_count = repo::count_pagos(pool, id).await?;
    Ok(CuentaBancariaDetalle {
        cuenta,
        pagos_count,
    })
}

pub async fn listar(
    pool: &SqlitePool,
    filter: &CuentaBancariaFilter,
) -> AppResult<Vec<CuentaBancaria>> {
    Ok(repo::list(pool, filter).await?)
}

/// 新建账户；第一个账户自动成为默认账户
pub async fn crear(
    pool: &SqlitePool,
    actor: Actor,
    mut dto: CreateCuentaBancaria,
) -> AppResult<CuentaBancaria> {
    dto.validate()?;

    let mut tx = pool.begin().await?;
    if repo::count(&mut *tx).await? == 0 {
        dto.predeterminada = true;
    }
    if dto.predeterminada {
        repo::clear_predeterminada(&mut *tx, None).await?;
    }
    let id = repo::insert(&mut *tx, &dto).await?;
    tx.commit().await?;

    let cuenta = buscar(pool, id).await?;
    audit_log::registrar(pool, actor, Accion::Crear, &cuenta).await;
    Ok(cuenta)
}

pub async fn actualizar(
    pool: &SqlitePool,
    actor: Actor,
    id: i64,
    patch: UpdateCuentaBancaria,
) -> AppResult<CuentaBancaria> {
    patch.validate()?;

    let mut tx = pool.begin().await?;
    let mut cuenta = repo::find(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::not_found("Cuenta bancaria"))?;
    patch.apply(&mut cuenta);
    cuenta.updated_at = crate::db::now();
    if cuenta.predeterminada {
        repo::clear_predeterminada(&mut *tx, Some(id)).await?;
    }
    repo::update(&mut *tx, &cuenta).await?;
    tx.commit().await?;

    audit_log::registrar(pool, actor, Accion::Actualizar, &cuenta).await;
    Ok(cuenta)
}

/// 物理删除；存在关联付款时拒绝
pub async fn eliminar(pool: &SqlitePool, actor: Actor, id: i64) -> AppResult<()> {
    let cuenta = buscar(pool, id).await?;
    let pagos = repo::count_pagos(pool, id).await?;
    if pagos > 0 {
        return Err(AppError::conflict(format!(
            "La cuenta tiene {} pago(s) asociados y no puede eliminarse",
            pagos
        )));
    }
    repo::delete(pool, id).await?;
    audit_log::registrar(pool, actor, Accion::Eliminar, &cuenta).await;
    Ok(())
}
