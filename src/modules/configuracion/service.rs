use sqlx::SqlitePool;
use validator::Validate;

use super::models::{Agenda, Configuracion, UpdateConfiguracion};
use super::repo;
use crate::conf::AppConfiguration;
use crate::error::{AppError, AppResult};
use crate::modules::audit_log::{self, Accion};
use crate::state::Actor;

/// 首次启动时根据配置文件写入默认营业配置
pub async fn ensure_seeded(pool: &SqlitePool, cfg: &AppConfiguration) -> AppResult<()> {
    if repo::get(pool).await?.is_some() {
        return Ok(());
    }
    let inicial = Configuracion {
        nombre_negocio: cfg.negocio.nombre.clone(),
        telefono: None,
        direccion: None,
        moneda: cfg.negocio.moneda.clone(),
        intervalo_citas: i64::from(cfg.agenda.intervalo),
        hora_apertura: cfg.agenda.apertura,
        hora_cierre: cfg.agenda.cierre,
        permitir_superposicion: cfg.agenda.permitir_superposicion,
        updated_at: crate::db::now(),
    };
    repo::save(pool, &inicial).await?;
    tracing::info!("configuración inicial creada para '{}'", inicial.nombre_negocio);
    Ok(())
}

pub async fn obtener(pool: &SqlitePool) -> AppResult<Configuracion> {
    repo::get(pool)
        .await?
        .ok_or_else(|| AppError::not_found("Configuración"))
}

pub async fn actualizar(
    pool: &SqlitePool,
    actor: Actor,
    patch: UpdateConfiguracion,
) -> AppResult<Configuracion> {
    patch.validate()?;
    let mut actual = obtener(pool).await?;
    patch.apply(&mut actual);
    actual.validar_horario()?;
    actual.updated_at = crate::db::now();

    repo::save(pool, &actual).await?;
    audit_log::registrar(pool, actor, Accion::Actualizar, &actual).await;
    Ok(actual)
}

/// 当前预约参数 / Current scheduling parameters
pub async fn agenda(pool: &SqlitePool, cfg: &AppConfiguration) -> AppResult<Agenda> {
    let c = obtener(pool).await?;
    Ok(Agenda::from_configuracion(&c, cfg.agenda.sugerencias))
}
