use sqlx::SqliteExecutor;

use super::models::{Rol, Usuario, UsuarioFilter};
use crate::db::SelectBuilder;

const SELECT: &str = "SELECT id, nombre, email, password_hash, password_salt, rol, activo, \
                      created_at, updated_at FROM usuarios";

pub async fn find<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<Option<Usuario>> {
    sqlx::query_as::<_, Usuario>(&format!("{} WHERE id = ?", SELECT))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn find_by_email<'e, E: SqliteExecutor<'e>>(
    db: E,
    email: &str,
) -> sqlx::Result<Option<Usuario>> {
    sqlx::query_as::<_, Usuario>(&format!("{} WHERE email = ?", SELECT))
        .bind(email)
        .fetch_optional(db)
        .await
}

pub async fn list<'e, E: SqliteExecutor<'e>>(
    db: E,
    filter: &UsuarioFilter,
) -> sqlx::Result<Vec<Usuario>> {
    let mut sb = SelectBuilder::new(SELECT).where_opt("rol = ", filter.rol);
    if !filter.incluir_inactivos {
        sb = sb.where_raw("activo = 1");
    }
    let mut qb = sb.order_by("nombre ASC").into_inner();
    qb.build_query_as::<Usuario>().fetch_all(db).await
}

pub async fn count_admins_activos<'e, E: SqliteExecutor<'e>>(db: E) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM usuarios WHERE rol = 'admin' AND activo = 1")
        .fetch_one(db)
        .await
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(
    db: E,
    nombre: &str,
    email: &str,
    password_hash: &str,
    password_salt: &str,
    rol: Rol,
) -> sqlx::Result<i64> {
    let now = crate::db::now();
    let res = sqlx::query(
        "INSERT INTO usuarios (nombre, email, password_hash, password_salt, rol, activo,
                               created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(nombre)
    .bind(email)
    .bind(password_hash)
    .bind(password_salt)
    .bind(rol)
    .bind(now)
    .bind(now)
    .execute(db)
    .await?;
    Ok(res.last_insert_rowid())
}

pub async fn update<'e, E: SqliteExecutor<'e>>(db: E, u: &Usuario) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE usuarios SET nombre = ?, email = ?, password_hash = ?, password_salt = ?,
                rol = ?, activo = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&u.nombre)
    .bind(&u.email)
    .bind(&u.password_hash)
    .bind(&u.password_salt)
    .bind(u.rol)
    .bind(u.activo)
    .bind(u.updated_at)
    .bind(u.id)
    .execute(db)
    .await?;
    Ok(())
}
