use sqlx::SqlitePool;
use validator::Validate;

use super::models::{CreateUsuario, Usuario, UsuarioFilter, UpdateUsuario};
use super::{password, repo};
use crate::error::{AppError, AppResult};
use crate::modules::audit_log::{self, Accion};
use crate::state::Actor;

pub async fn obtener(pool: &SqlitePool, id: i64) -> AppResult<Usuario> {
    repo::find(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Usuario"))
}

pub async fn listar(pool: &SqlitePool, filter: &UsuarioFilter) -> AppResult<Vec<Usuario>> {
    Ok(repo::list(pool, filter).await?)
}

async fn email_disponible(pool: &SqlitePool, email: &str, propio: Option<i64>) -> AppResult<()> {
    match repo::find_by_email(pool, email).await? {
        Some(u) if Some(u.id) != propio => Err(AppError::conflict(format!(
            "El email {} ya está registrado",
            email
        ))),
        _ => Ok(()),
    }
}

pub async fn crear(pool: &SqlitePool, actor: Actor, dto: CreateUsuario) -> AppResult<Usuario> {
    dto.validate()?;
    let email = dto.email.trim().to_lowercase();
    email_disponible(pool, &email, None).await?;

    let (hash, salt) = password::hash_nuevo(&dto.password);
    let id = repo::insert(pool, dto.nombre.trim(), &email, &hash, &salt, dto.rol).await?;
    let usuario = obtener(pool, id).await?;
    audit_log::registrar(pool, actor, Accion::Crear, &usuario).await;
    Ok(usuario)
}

/// 保存变更；不允许停用或降级最后一个启用的管理员。
///
/// 计数与更新在同一事务内完成，两个并发请求不能各自看到两个管理员。
async fn guardar_protegiendo_admin(
    pool: &SqlitePool,
    antes: &Usuario,
    despues: &Usuario,
) -> AppResult<()> {
    let mut tx = pool.begin().await?;
    if antes.es_admin_activo() && !despues.es_admin_activo() {
        let admins = repo::count_admins_activos(&mut *tx).await?;
        if admins <= 1 {
            return Err(AppError::conflict(
                "No se puede desactivar al último administrador activo",
            ));
        }
    }
    repo::update(&mut *tx, despues).await?;
    tx.commit().await?;
    Ok(())
}

pub async fn actualizar(
    pool: &SqlitePool,
    actor: Actor,
    id: i64,
    mut patch: UpdateUsuario,
) -> AppResult<Usuario> {
    patch.validate()?;
    let antes = obtener(pool, id).await?;
    let mut usuario = antes.clone();
    patch.apply(&mut usuario);

    if usuario.email != antes.email {
        email_disponible(pool, &usuario.email, Some(id)).await?;
    }
    if let Some(nueva) = patch.password.take() {
        let (hash, salt) = password::hash_nuevo(&nueva);
        usuario.password_hash = hash;
        usuario.password_salt = salt;
    }
    usuario.updated_at = crate::db::now();

    guardar_protegiendo_admin(pool, &antes, &usuario).await?;
    audit_log::registrar(pool, actor, Accion::Actualizar, &usuario).await;
    Ok(usuario)
}

/// 软删除 / Soft delete
pub async fn eliminar(pool: &SqlitePool, actor: Actor, id: i64) -> AppResult<Usuario> {
    let antes = obtener(pool, id).await?;
    let mut usuario = antes.clone();
    usuario.activo = false;
    usuario.updated_at = crate::db::now();

    guardar_protegiendo_admin(pool, &antes, &usuario).await?;
    audit_log::registrar(pool, actor, Accion::Eliminar, &usuario).await;
    Ok(usuario)
}
