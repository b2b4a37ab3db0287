use sqlx::SqliteExecutor;

use super::models::{CreateServicio, Servicio, ServicioFilter};
use crate::db::SelectBuilder;

const SELECT: &str = "SELECT id, nombre, descripcion, categoria, duracion, precio, activo, \
                      created_at, updated_at FROM servicios";

pub async fn find<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<Option<Servicio>> {
    sqlx::query_as::<_, Servicio>(&format!("{} WHERE id = ?", SELECT))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn list<'e, E: SqliteExecutor<'e>>(
    db: E,
    filter: &ServicioFilter,
) -> sqlx::Result<Vec<Servicio>> {
    let mut sb = SelectBuilder::new(SELECT).where_opt("categoria = ", filter.categoria.clone());
    if !filter.incluir_inactivos {
        sb = sb.where_raw("activo = 1");
    }
    let mut qb = sb.order_by("categoria ASC, nombre ASC").into_inner();
    qb.build_query_as::<Servicio>().fetch_all(db).await
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(db: E, s: &CreateServicio) -> sqlx::Result<i64> {
    let now = crate::db::now();
    let res = sqlx::query(
        "INSERT INTO servicios (nombre, descripcion, categoria, duracion, precio, activo,
                                created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(s.nombre.trim())
    .bind(&s.descripcion)
    .bind(&s.categoria)
    .bind(s.duracion)
    .bind(s.precio)
    .bind(now)
    .bind(now)
    .execute(db)
    .await?;
    Ok(res.last_insert_rowid())
}

pub async fn update<'e, E: SqliteExecutor<'e>>(db: E, s: &Servicio) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE servicios SET nombre = ?, descripcion = ?, categoria = ?, duracion = ?,
                precio = ?, activo = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&s.nombre)
    .bind(&s.descripcion)
    .bind(&s.categoria)
    .bind(s.duracion)
    .bind(s.precio)
    .bind(s.activo)
    .bind(s.updated_at)
    .bind(s.id)
    .execute(db)
    .await?;
    Ok(())
}
