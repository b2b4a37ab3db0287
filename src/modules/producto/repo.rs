use sqlx::SqliteExecutor;

use super::models::{CreateProducto, Producto, ProductoFilter};
use crate::db::SelectBuilder;

const SELECT: &str = "SELECT id, nombre, descripcion, marca, categoria, precio, costo, stock, \
                      stock_minimo, activo, created_at, updated_at FROM productos";

pub async fn find<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<Option<Producto>> {
    sqlx::query_as::<_, Producto>(&format!("{} WHERE id = ?", SELECT))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn list<'e, E: SqliteExecutor<'e>>(
    db: E,
    filter: &ProductoFilter,
) -> sqlx::Result<Vec<Producto>> {
    let mut sb = SelectBuilder::new(SELECT).where_opt("categoria = ", filter.categoria.clone());
    if filter.bajo_stock {
        sb = sb.where_raw("stock <= stock_minimo");
    }
    if !filter.incluir_inactivos {
        sb = sb.where_raw("activo = 1");
    }
    let mut qb = sb.order_by("nombre ASC").into_inner();
    qb.build_query_as::<Producto>().fetch_all(db).await
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(db: E, p: &CreateProducto) -> sqlx::Result<i64> {
    let now = crate::db::now();
    let res = sqlx::query(
        "INSERT INTO productos (nombre, descripcion, marca, categoria, precio, costo, stock,
                                stock_minimo, activo, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(p.nombre.trim())
    .bind(&p.descripcion)
    .bind(&p.marca)
    .bind(&p.categoria)
    .bind(p.precio)
    .bind(p.costo)
    .bind(p.stock)
    .bind(p.stock_minimo)
    .bind(now)
    .bind(now)
    .execute(db)
    .await?;
    Ok(res.last_insert_rowid())
}

pub async fn update<'e, E: SqliteExecutor<'e>>(db: E, p: &Producto) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE productos SET nombre = ?, descripcion = ?, marca = ?, categoria = ?, precio = ?,
                costo = ?, stock = ?, stock_minimo = ?, activo = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&p.nombre)
    .bind(&p.descripcion)
    .bind(&p.marca)
    .bind(&p.categoria)
    .bind(p.precio)
    .bind(p.costo)
    .bind(p.stock)
    .bind(p.stock_minimo)
    .bind(p.activo)
    .bind(p.updated_at)
    .bind(p.id)
    .execute(db)
    .await?;
    Ok(())
}

/// 原子地调整库存；结果为负时不更新，返回 `false`
pub async fn adjust_stock<'e, E: SqliteExecutor<'e>>(
    db: E,
    id: i64,
    cantidad: i64,
) -> sqlx::Result<bool> {
    let res = sqlx::query(
        "UPDATE productos SET stock = stock + ?, updated_at = ?
         WHERE id = ? AND stock + ? >= 0",
    )
    .bind(cantidad)
    .bind(crate::db::now())
    .bind(id)
    .bind(cantidad)
    .execute(db)
    .await?;
    Ok(res.rows_affected() == 1)
}
