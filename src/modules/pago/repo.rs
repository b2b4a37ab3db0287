use sqlx::SqliteExecutor;

use super::models::{Pago, PagoFilter, ResumenMetodo, ResumenQuery};
use crate::db::SelectBuilder;

const SELECT: &str = "SELECT id, cita_id, monto, metodo, cuenta_bancaria_id, fecha, referencia, \
                      notas, created_at FROM pagos";

pub async fn find<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<Option<Pago>> {
    sqlx::query_as::<_, Pago>(&format!("{} WHERE id = ?", SELECT))
        .bind(id)
        .fetch_optional(db)
        .await
}

pub async fn list<'e, E: SqliteExecutor<'e>>(
    db: E,
    filter: &PagoFilter,
) -> sqlx::Result<Vec<Pago>> {
    let mut qb = SelectBuilder::new(SELECT)
        .where_opt("cita_id = ", filter.cita_id)
        .where_opt("metodo = ", filter.metodo)
        .where_opt("fecha >= ", filter.desde)
        .where_opt("fecha <= ", filter.hasta)
        .order_by("fecha DESC, id DESC")
        .into_inner();
    qb.build_query_as::<Pago>().fetch_all(db).await
}

pub async fn resumen<'e, E: SqliteExecutor<'e>>(
    db: E,
    q: &ResumenQuery,
) -> sqlx::Result<Vec<ResumenMetodo>> {
    let mut qb = SelectBuilder::new(
        "SELECT metodo, COALESCE(SUM(monto), 0.0) AS total, COUNT(*) AS cantidad FROM pagos",
    )
    .where_opt("fecha >= ", q.desde)
    .where_opt("fecha <= ", q.hasta)
    .group_by("metodo")
    .order_by("metodo ASC")
    .into_inner();
    qb.build_query_as::<ResumenMetodo>().fetch_all(db).await
}

pub async fn insert<'e, E: SqliteExecutor<'e>>(db: E, p: &Pago) -> sqlx::Result<i64> {
    let res = sqlx::query(
        "INSERT INTO pagos (cita_id, monto, metodo, cuenta_bancaria_id, fecha, referencia, notas,
                            created_at)
         VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(p.cita_id)
    .bind(p.monto)
    .bind(p.metodo)
    .bind(p.cuenta_bancaria_id)
    .bind(p.fecha)
    .bind(&p.referencia)
    .bind(&p.notas)
    .bind(p.created_at)
    .execute(db)
    .await?;
    Ok(res.last_insert_rowid())
}

pub async fn update<'e, E: SqliteExecutor<'e>>(db: E, p: &Pago) -> sqlx::Result<()> {
    sqlx::query(
        "UPDATE pagos SET monto = ?, metodo = ?, cuenta_bancaria_id = ?, fecha = ?,
                referencia = ?, notas = ?
         WHERE id = ?",
    )
    .bind(p.monto)
    .bind(p.metodo)
    .bind(p.cuenta_bancaria_id)
    .bind(p.fecha)
    .bind(&p.referencia)
    .bind(&p.notas)
    .bind(p.id)
    .execute(db)
    .await?;
    Ok(())
}

pub async fn delete<'e, E: SqliteExecutor<'e>>(db: E, id: i64) -> sqlx::Result<u64> {
    let res = sqlx::query("DELETE FROM pagos WHERE id = ?")
        .bind(id)
        .execute(db)
        .await?;
    Ok(res.rows_affected())
}
