use sqlx::SqliteExecutor;

use super::models::Configuracion;

const COLUMNS: &str = "nombre_negocio, telefono, direccion, moneda, intervalo_citas, \
                       hora_apertura, hora_cierre, permitir_superposicion, updated_at";

pub async fn get<'e, E: SqliteExecutor<'e>>(db: E) -> sqlx::Result<Option<Configuracion>> {
    sqlx::query_as::<_, Configuracion>(&format!(
        "SELECT {} FROM configuracion WHERE id = 1",
        COLUMNS
    ))
    .fetch_optional(db)
    .await
}

/// 写入整行（不存在则插入）/ Upsert the singleton row
pub async fn save<'e, E: SqliteExecutor<'e>>(db: E, c: &Configuracion) -> sqlx::Result<()> {
    sqlx::query(&format!(
        "INSERT INTO configuracion (id, {}) VALUES (1, ?, ?, ?, ?, ?, ?, ?, ?, ?)
         ON CONFLICT(id) DO UPDATE SET
            nombre_negocio = excluded.nombre_negocio,
            telefono = excluded.telefono,
            direccion = excluded.direccion,
            moneda = excluded.moneda,
            intervalo_citas = excluded.intervalo_citas,
            hora_apertura = excluded.hora_apertura,
            hora_cierre = excluded.hora_cierre,
            permitir_superposicion = excluded.permitir_superposicion,
            updated_at = excluded.updated_at",
        COLUMNS
    ))
    .bind(&c.nombre_negocio)
    .bind(&c.telefono)
    .bind(&c.direccion)
    .bind(&c.moneda)
    .bind(c.intervalo_citas)
    .bind(c.hora_apertura)
    .bind(c.hora_cierre)
    .bind(c.permitir_superposicion)
    .bind(c.updated_at)
    .execute(db)
    .await?;
    Ok(())
}
