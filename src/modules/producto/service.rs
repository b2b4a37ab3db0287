use sqlx::SqlitePool;
use validator::Validate;

use super::models::{AjusteStock, CreateProducto, Producto, ProductoFilter, UpdateProducto};
use super::repo;
use crate::error::{AppError, AppResult};
use crate::modules::audit_log::{self, Accion};
use crate::state::Actor;

pub async fn obtener(pool: &SqlitePool, id: i64) -> AppResult<Producto> {
    repo::find(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Producto"))
}

pub async fn listar(pool: &SqlitePool, filter: &ProductoFilter) -> AppResult<Vec<Producto>> {
    Ok(repo::list(pool, filter).await?)
}

pub async fn crear(pool: &SqlitePool, actor: Actor, dto: CreateProducto) -> AppResult<Producto> {
    dto.validate()?;
    let id = repo::insert(pool, &dto).await?;
    let producto = obtener(pool, id).await?;
    audit_log::registrar(pool, actor, Accion::Crear, &producto).await;
    Ok(producto)
}

pub async fn actualizar(
    pool: &SqlitePool,
    actor: Actor,
    id: i64,
    patch: UpdateProducto,
) -> AppResult<Producto> {
    patch.validate()?;
    let mut producto = obtener(pool, id).await?;
    patch.apply(&mut producto);
    producto.updated_at = crate::db::now();
    repo::update(pool, &producto).await?;
    audit_log::registrar(pool, actor, Accion::Actualizar, &producto).await;
    Ok(producto)
}

pub async fn eliminar(pool: &SqlitePool, actor: Actor, id: i64) -> AppResult<Producto> {
    let mut producto = obtener(pool, id).await?;
    producto.activo = false;
    producto.updated_at = crate::db::now();
    repo::update(pool, &producto).await?;
    audit_log::registrar(pool, actor, Accion::Eliminar, &producto).await;
    Ok(producto)
}

/// 库存调整 / Signed stock adjustment
pub async fn ajustar_stock(
    pool: &SqlitePool,
    actor: Actor,
    id: i64,
    ajuste: AjusteStock,
) -> AppResult<Producto> {
    ajuste.validate()?;
    let cantidad = ajuste.cantidad;
    let actual = obtener(pool, id).await?;
    if !repo::adjust_stock(pool, id, cantidad).await? {
        return Err(AppError::conflict(format!(
            "Stock insuficiente: disponible {}, solicitado {}",
            actual.stock,
            cantidad.unsigned_abs()
        )));
    }
    let producto = obtener(pool, id).await?;
    if producto.bajo_stock() {
        tracing::info!(producto = id, stock = producto.stock, "producto con stock bajo");
    }
    audit_log::registrar(pool, actor, Accion::Actualizar, &producto).await;
    Ok(producto)
}
