use sqlx::{SqliteExecutor, SqlitePool};

use super::models::{Accion, AuditFilter, AuditLog, Auditable};
use super::repo;
use crate::error::AppResult;
use crate::state::Actor;

/// 记录审计日志 / Append an audit entry for `entity`.
///
/// Failures are logged and swallowed: the audited operation has already
/// succeeded by the time this runs.
pub async fn registrar<'e, E, T>(db: E, actor: Actor, accion: Accion, entity: &T)
where
    E: SqliteExecutor<'e>,
    T: Auditable,
{
    let detalles = serde_json::to_value(entity).ok();
    registrar_raw(db, actor, accion, T::ENTIDAD, Some(entity.audit_id()), detalles).await;
}

pub async fn registrar_raw<'e, E: SqliteExecutor<'e>>(
    db: E,
    actor: Actor,
    accion: Accion,
    entidad: &str,
    entidad_id: Option<i64>,
    detalles: Option<serde_json::Value>,
) {
    if let Err(e) = repo::insert(db, actor.0, accion, entidad, entidad_id, detalles).await {
        tracing::warn!(
            entidad,
            entidad_id,
            "audit log write failed: {}",
            e
        );
    }
}

pub async fn listar(pool: &SqlitePool, filter: &AuditFilter) -> AppResult<Vec<AuditLog>> {
    Ok(repo::list(pool, filter).await?)
}
