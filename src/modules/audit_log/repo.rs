use sqlx::types::Json;
use sqlx::SqliteExecutor;

use super::models::{Accion, AuditFilter, AuditLog};
use crate::db::SelectBuilder;

pub async fn insert<'e, E: SqliteExecutor<'e>>(
    db: E,
    usuario_id: Option<i64>,
    accion: Accion,
    entidad: &str,
    entidad_id: Option<i64>,
    detalles: Option<serde_json::Value>,
) -> sqlx::Result<i64> {
    let res = sqlx::query(
        "INSERT INTO audit_logs (usuario_id, accion, entidad, entidad_id, detalles, created_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(usuario_id)
    .bind(accion)
    .bind(entidad)
    .bind(entidad_id)
    .bind(detalles.map(Json))
    .bind(crate::db::now())
    .execute(db)
    .await?;
    Ok(res.last_insert_rowid())
}

pub async fn list<'e, E: SqliteExecutor<'e>>(
    db: E,
    filter: &AuditFilter,
) -> sqlx::Result<Vec<AuditLog>> {
    let mut qb = SelectBuilder::new(
        "SELECT id, usuario_id, accion, entidad, entidad_id, detalles, created_at FROM audit_logs",
    )
    .where_opt("entidad = ", filter.entidad.clone())
    .where_opt("entidad_id = ", filter.entidad_id)
    .where_opt("usuario_id = ", filter.usuario_id)
    .order_by("id DESC")
    .limit(filter.limit())
    .into_inner();
    qb.build_query_as::<AuditLog>().fetch_all(db).await
}
