use chrono::NaiveDate;
use sqlx::SqliteExecutor;

use super::models::{Cita, CitaAgenda, CitaDetalle, CitaFilter, CreateCita, EstadoCita};
use crate::db::SelectBuilder;

const CLIENTE_NOMBRE: &str = "TRIM(cl.nombre || ' ' || COALESCE(cl.apellido, ''))";

fn select_detalle() -> String {
    format!(
        "SELECT c.id, c.cliente_id, c.servicio_id, c.usuario_id, c.fecha, c.hora, c.duracion, \
         c.estado, c.precio, c.notas, c.created_at, c.updated_at, \
         {} AS cliente_nombre, s.nombre AS servicio_nombre \
         FROM citas c \
         JOIN clientes cl ON cl.id = c.cliente_id \
         LEFT JOIN servicios s ON s.id = c.servicio_id",
        CLIENTE_NOMBRE
    )
}

pub async fn find<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<Option<Cita>> {
    sqlx::query_as::<_, Cita>(
        "SELECT id, cliente_id, servicio_id, usuario_id, fecha, hora, duracion, estado, precio,
                notas, created_at, updated_at
         FROM citas WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(db)
    .await
}

pub async fn find_detalle<'e, E: SqliteExecutor<'e>>(
    db: E,
    id: i64,
) -> sqlx::Result<Option<CitaDetalle>> {
    sqlx::query_as::<_, CitaDetalle>(&format!("{} WHERE c.id = ?", select_detalle()))
        .bind(id)
        .fetch_optional(db)
        .await
}

/// `descendente` 为 true 时最新的在前
pub async fn list<'e, E: SqliteExecutor<'e>>(
    db: E,
    filter: &CitaFilter,
    descendente: bool,
) -> sqlx::Result<Vec<CitaDetalle>> {
    let base = select_detalle();
    let mut qb = SelectBuilder::new(&base)
        .where_opt("c.fecha = ", filter.fecha)
        .where_opt("c.fecha >= ", filter.desde)
        .where_opt("c.fecha <= ", filter.hasta)
        .where_opt("c.cliente_id = ", filter.cliente_id)
        .where_opt("c.estado = ", filter.estado)
        .order_by(if descendente {
            "c.fecha DESC, c.hora DESC"
        } else {
            "c.fecha ASC, c.hora ASC"
        })
        .into_inner();
    qb.build_query_as::<CitaDetalle>().fetch_all(db).await
}

/// 当天全部预约（含已取消，由调用方过滤）
pub async fn agenda_del_dia<'e, E: SqliteExecutor<'e>>(
    db: E,
    fecha: NaiveDate,
) -> sqlx::Result<Vec<CitaAgenda>> {
    sqlx::query_as::<_, CitaAgenda>(&format!(
        "SELECT c.id, c.hora, c.duracion, s.duracion AS servicio_duracion, c.estado,
                {} AS cliente_nombre, s.nombre AS servicio_nombre
         FROM citas c
         JOIN clientes cl ON cl.id = c.cliente_id
         LEFT JOIN servicios s ON s.id = c.servicio_id
         WHERE c.fecha = ?
         ORDER BY c.hora ASC",
        CLIENTE_NOMBRE
    ))
    .bind(fecha)
    .fetch_all(db)
    .await
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(
    db: E,
    c: &CreateCita,
    precio: Option<f64>,
) -> sqlx::Result<i64> {
    let now = crate::db::now();
    let res = sqlx::query(
        "INSERT INTO citas (cliente_id, servicio_id, usuario_id, fecha, hora, duracion, estado,
                            precio, notas, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(c.cliente_id)
    .bind(c.servicio_id)
    .bind(c.usuario_id)
    .bind(c.fecha)
    .bind(c.hora)
    .bind(c.duracion)
    .bind(c.estado)
    .bind(precio)
    .bind(&c.notas)
    .bind(now)
    .bind(now)
    .execute(db)
    .await?;
    Ok(res.last_insert_rowid())
}

pub async fn update<'e, E: SqliteExecutor<'e>>(db: E, c: &Cita) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE citas SET cliente_id = ?, servicio_id = ?, usuario_id = ?, fecha = ?, hora = ?,
                duracion = ?, estado = ?, precio = ?, notas = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(c.cliente_id)
    .bind(c.servicio_id)
    .bind(c.usuario_id)
    .bind(c.fecha)
    .bind(c.hora)
    .bind(c.duracion)
    .bind(c.estado)
    .bind(c.precio)
    .bind(&c.notas)
    .bind(c.updated_at)
    .bind(c.id)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn set_estado<'e, E: SqliteExecutor<'e>>(
    db: E,
    id: i64,
    estado: EstadoCita,
) -> sqlx::Result<()> {
    sqlx::query("UPDATE citas SET estado = ?, updated_at = ? WHERE id = ?")
        .bind(estado)
        .bind(crate::db::now())
        .bind(id)
        .execute(db)
        .await?;
    Ok(())
}

pub async fn count_pagos<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<i64> {
    sqlx::query_scalar("SELECT COUNT(*) FROM pagos WHERE cita_id = ?")
        .bind(id)
        .fetch_one(db)
        .await
}

pub async fn delete<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM citas WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}
