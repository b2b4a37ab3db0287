use sqlx::SqliteExecutor;

use super::models::{CreateCuentaBancaria, CuentaBancaria, CuentaBancariaFilter};
use crate::db::SelectBuilder;

const SELECT: &str = "SELECT id, banco, titular, numero_cuenta, tipo_cuenta, alias, \
                      predeterminada, activa, created_at, updated_at FROM cuentas_bancarias";

pub async fn find<'e, E: SqliteExecutor<'e>>(
    db: E,
    id: i64,
) -> sqlx::Result<Option<CuentaBancaria>> {
    sqlx::query_as::<_, CuentaBancaria>(&format!("{} WHERE id = ?", SELECT))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// 当前默认且启用的账户
pub async fn find_predeterminada<'e, E: SqliteExecutor<'e>>(
    db: E,
) -> sqlx::Result<Option<CuentaBancaria>> {
    sqlx::query_as::<_, CuentaBancaria>(&format!(
        "{} WHERE predeterminada = 1 AND activa = 1 LIMIT 1",
        SELECT
    ))
    .fetch_optional(db)
    .await
}

pub async fn list<'e, E: SqliteExecutor<'e>>(
    db: E,
    filter: &CuentaBancariaFilter,
) -> sqlx::Result<Vec<CuentaBancaria>> {
    let mut qb = SelectBuilder::new(SELECT)
        .where_opt("activa = ", filter.activa)
        .order_by("predeterminada DESC, banco ASC")
        .into_inner();
    qb.build_query_as::<CuentaBancaria>().fetch_all(db).await
}

pub async fn count<'e, E: SqliteExecutor<'e>>(db: E) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM cuentas_bancarias")
        .fetch_one(db)
        .await
}

pub async fn count_pagos<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM pagos WHERE cuenta_bancaria_id = ?")
        .bind(id)
        .fetch_one(db)
        .await
}

/// 取消其他账户的默认标记
pub async fn clear_predeterminada<'e, E: SqliteExecutor<'e>>(
    db: E,
    except: Option<i64>,
) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE cuentas_bancarias SET predeterminada = 0, updated_at = ?
         WHERE predeterminada = 1 AND id <> COALESCE(?, -1)",
    )
    .bind(crate::db::now())
    .bind(except)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(
    db: E,
    c: &CreateCuentaBancaria,
) -> sqlx::Result<i64> {
    let now = crate::db::now();
    let res = sqlx::query(
        "INSERT INTO cuentas_bancarias (banco, titular, numero_cuenta, tipo_cuenta, alias,
                                        predeterminada, activa, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(c.banco.trim())
    .bind(c.titular.trim())
    .bind(c.numero_cuenta.trim())
    .bind(&c.tipo_cuenta)
    .bind(&c.alias)
    .bind(c.predeterminada)
    .bind(now)
    .bind(now)
    .execute(db)
    .await?;
    Ok(res.last_insert_rowid())
}

pub async fn update<'e, E: SqliteExecutor<'e>>(db: E, c: &CuentaBancaria) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE cuentas_bancarias SET banco = ?, titular = ?, numero_cuenta = ?, tipo_cuenta = ?,
                alias = ?, predeterminada = ?, activa = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&c.banco)
    .bind(&c.titular)
    .bind(&c.numero_cuenta)
    .bind(&c.tipo_cuenta)
    .bind(&c.alias)
    .bind(c.predeterminada)
    .bind(c.activa)
    .bind(c.updated_at)
    .bind(c.id)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn delete<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM cuentas_bancarias WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}
