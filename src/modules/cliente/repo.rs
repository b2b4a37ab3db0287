use sqlx::SqliteExecutor;

use super::models::{Cliente, ClienteFilter, CreateCliente};
use crate::db::SelectBuilder;

const SELECT: &str = "SELECT id, nombre, apellido, telefono, email, fecha_nacimiento, direccion, \
                      notas, foto_url, activo, created_at, updated_at FROM clientes";

pub async fn find<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<Option<Cliente>> {
    sqlx::query_as::<_, Cliente>(&format!("{} WHERE id = ?", SELECT))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn list<'e, E: SqliteExecutor<'e>>(
    db: E,
    filter: &ClienteFilter,
) -> sqlx::Result<Vec<Cliente>> {
    let mut sb = SelectBuilder::new(SELECT);
    if !filter.incluir_inactivos {
        sb = sb.where_raw("activo = 1");
    }
    if let Some(q) = filter.q.as_deref().filter(|q| !q.trim().is_empty()) {
        sb = sb.where_like_any(&["nombre", "apellido", "telefono", "email"], q);
    }
    let mut qb = sb.order_by("nombre ASC, apellido ASC").into_inner();
    qb.build_query_as::<Cliente>().fetch_all(db).await
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(db: E, c: &CreateCliente) -> sqlx::Result<i64> {
    let now = crate::db::now();
    let res = sqlx::query(
        "INSERT INTO clientes (nombre, apellido, telefono, email, fecha_nacimiento, direccion,
                               notas, foto_url, activo, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(c.nombre.trim())
    .bind(&c.apellido)
    .bind(&c.telefono)
    .bind(&c.email)
    .bind(c.fecha_nacimiento)
    .bind(&c.direccion)
    .bind(&c.notas)
    .bind(&c.foto_url)
    .bind(now)
    .bind(now)
    .execute(db)
    .await?;
    Ok(res.last_insert_rowid())
}

pub async fn update<'e, E: SqliteExecutor<'e>>(db: E, c: &Cliente) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE clientes SET nombre = ?, apellido = ?, telefono = ?, email = ?,
                fecha_nacimiento = ?, direccion = ?, notas = ?, foto_url = ?, activo = ?,
                updated_at = ?
         WHERE id = ?",
    )
    .bind(&c.nombre)
    .bind(&c.apellido)
    .bind(&c.telefono)
    .bind(&c.email)
    .bind(c.fecha_nacimiento)
    .bind(&c.direccion)
    .bind(&c.notas)
    .bind(&c.foto_url)
    .bind(c.activo)
    .bind(c.updated_at)
    .bind(c.id)
    .execute(db)
    .await?;
    Ok(())
}
