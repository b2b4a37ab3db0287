use chrono::NaiveDate;
use sqlx::{SqliteExecutor, SqlitePool};
use validator::Validate;

use super::disponibilidad::{self, Solicitud};
use super::models::{
    Cita, CitaDetalle, CitaFilter, CreateCita, Disponibilidad, DisponibilidadQuery, UpdateCita,
};
use super::repo;
use crate::conf::AppConfiguration;
use crate::error::{AppError, AppResult};
use crate::modules::audit_log::{self, Accion};
use crate::modules::configuracion::{self, models::Agenda};
use crate::modules::{cliente, servicio, usuario};
use crate::state::Actor;

fn minutos_opt(d: Option<i64>) -> Option<u32> {
    d.and_then(|v| u32::try_from(v).ok())
}

pub async fn obtener(pool: &SqlitePool, id: i64) -> AppResult<CitaDetalle> {
    repo::find_detalle(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Cita"))
}

pub async fn listar(pool: &SqlitePool, filter: &CitaFilter) -> AppResult<Vec<CitaDetalle>> {
    Ok(repo::list(pool, filter, false).await?)
}

/// 客户预约历史，最新在前
pub async fn historial_cliente(pool: &SqlitePool, cliente_id: i64) -> AppResult<Vec<CitaDetalle>> {
    let filter = CitaFilter {
        cliente_id: Some(cliente_id),
        ..Default::default()
    };
    Ok(repo::list(pool, &filter, true).await?)
}

async fn duracion_de_servicio(pool: &SqlitePool, servicio_id: Option<i64>) -> AppResult<Option<u32>> {
    match servicio_id {
        Some(id) => {
            let s = servicio::service::obtener(pool, id).await?;
            Ok(minutos_opt(Some(s.duracion)))
        }
        None => Ok(None),
    }
}

/// 查询候选时间段
pub async fn disponibilidad(
    pool: &SqlitePool,
    cfg: &AppConfiguration,
    q: &DisponibilidadQuery,
) -> AppResult<Disponibilidad> {
    q.validate()?;
    let agenda = configuracion::service::agenda(pool, cfg).await?;
    let solicitud = Solicitud {
        hora: Some(q.hora),
        duracion: minutos_opt(q.duracion),
        duracion_servicio: duracion_de_servicio(pool, q.servicio_id).await?,
        permitir_superposicion: q.permitir_superposicion,
        excluir_cita_id: q.excluir_cita_id,
    };
    let citas = repo::agenda_del_dia(pool, q.fecha).await?;
    Ok(disponibilidad::calcular(&agenda, &solicitud, &citas))
}

/// 在给定连接/事务上检查，不可用时返回 409
async fn exigir_disponible<'e, E: SqliteExecutor<'e>>(
    db: E,
    agenda: &Agenda,
    fecha: NaiveDate,
    solicitud: &Solicitud,
) -> AppResult<Disponibilidad> {
    let citas = repo::agenda_del_dia(db, fecha).await?;
    let d = disponibilidad::calcular(agenda, solicitud, &citas);
    if d.disponible {
        return Ok(d);
    }
    let mensaje = if !d.dentro_de_horario {
        "El horario solicitado está fuera del horario de atención".to_string()
    } else {
        let horas: Vec<String> = d
            .conflictos
            .iter()
            .map(|c| format!("{}-{}", c.hora, c.hora_fin))
            .collect();
        format!("El horario se superpone con otra cita ({})", horas.join(", "))
    };
    Err(AppError::conflict(mensaje))
}

async fn validar_cliente(pool: &SqlitePool, cliente_id: i64) -> AppResult<()> {
    let cliente = cliente::service::obtener(pool, cliente_id).await?;
    if !cliente.activo {
        return Err(AppError::validation("clienteId", "el cliente está inactivo"));
    }
    Ok(())
}

pub async fn crear(
    pool: &SqlitePool,
    cfg: &AppConfiguration,
    actor: Actor,
    dto: CreateCita,
) -> AppResult<CitaDetalle> {
    dto.validate()?;
    validar_cliente(pool, dto.cliente_id).await?;
    let servicio = match dto.servicio_id {
        Some(id) => Some(servicio::service::obtener(pool, id).await?),
        None => None,
    };
    if let Some(uid) = dto.usuario_id {
        usuario::service::obtener(pool, uid).await?;
    }
    let agenda = configuracion::service::agenda(pool, cfg).await?;
    let precio = dto.precio.or(servicio.as_ref().map(|s| s.precio));

    let mut tx = pool.begin().await?;
    if dto.estado.ocupa_horario() {
        let solicitud = Solicitud {
            hora: Some(dto.hora),
            duracion: minutos_opt(dto.duracion),
            duracion_servicio: servicio.as_ref().and_then(|s| minutos_opt(Some(s.duracion))),
            permitir_superposicion: dto.permitir_superposicion,
            excluir_cita_id: None,
        };
        exigir_disponible(&mut *tx, &agenda, dto.fecha, &solicitud).await?;
    }
    let id = repo::insert(&mut *tx, &dto, precio).await?;
    tx.commit().await?;

    let detalle = obtener(pool, id).await?;
    audit_log::registrar(pool, actor, Accion::Crear, &detalle.cita).await;
    Ok(detalle)
}

fn cambia_horario(antes: &Cita, despues: &Cita) -> bool {
    antes.fecha != despues.fecha
        || antes.hora != despues.hora
        || antes.servicio_id != despues.servicio_id
        || antes.duracion != despues.duracion
        || (!antes.estado.ocupa_horario() && despues.estado.ocupa_horario())
}

pub async fn actualizar(
    pool: &SqlitePool,
    cfg: &AppConfiguration,
    actor: Actor,
    id: i64,
    patch: UpdateCita,
) -> AppResult<CitaDetalle> {
    patch.validate()?;
    let antes = repo::find(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Cita"))?;
    let permitir = patch.permitir_superposicion;
    let mut cita = antes.clone();
    patch.apply(&mut cita);

    if cita.cliente_id != antes.cliente_id {
        validar_cliente(pool, cita.cliente_id).await?;
    }
    if cita.usuario_id != antes.usuario_id {
        if let Some(uid) = cita.usuario_id {
            usuario::service::obtener(pool, uid).await?;
        }
    }
    let duracion_servicio = duracion_de_servicio(pool, cita.servicio_id).await?;
    let agenda = configuracion::service::agenda(pool, cfg).await?;
    cita.updated_at = crate::db::now();

    let mut tx = pool.begin().await?;
    if cita.estado.ocupa_horario() && cambia_horario(&antes, &cita) {
        let solicitud = Solicitud {
            hora: Some(cita.hora),
            duracion: minutos_opt(cita.duracion),
            duracion_servicio,
            permitir_superposicion: permitir,
            excluir_cita_id: Some(id),
        };
        exigir_disponible(&mut *tx, &agenda, cita.fecha, &solicitud).await?;
    }
    repo::update(&mut *tx, &cita).await?;
    tx.commit().await?;

    audit_log::registrar(pool, actor, Accion::Actualizar, &cita).await;
    obtener(pool, id).await
}

/// 物理删除；已有付款时拒绝
pub async fn eliminar(pool: &SqlitePool, actor: Actor, id: i64) -> AppResult<()> {
    let cita = repo::find(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Cita"))?;
    let pagos = repo::count_pagos(pool, id).await?;
    if pagos > 0 {
        return Err(AppError::conflict(format!(
            "La cita tiene {} pago(s) registrados y no puede eliminarse",
            pagos
        )));
    }
    repo::delete(pool, id).await?;
    audit_log::registrar(pool, actor, Accion::Eliminar, &cita).await;
    Ok(())
}

/// 某天的预约与空闲时间（命令行 `agenda` 使用）
pub async fn agenda_del_dia(
    pool: &SqlitePool,
    cfg: &AppConfiguration,
    fecha: NaiveDate,
) -> AppResult<(Vec<CitaDetalle>, Vec<String>)> {
    let agenda = configuracion::service::agenda(pool, cfg).await?;
    let filter = CitaFilter {
        fecha: Some(fecha),
        ..Default::default()
    };
    let citas = repo::list(pool, &filter, false).await?;
    let ocupacion = repo::agenda_del_dia(pool, fecha).await?;
    let libres = disponibilidad::horarios_libres(&agenda, &ocupacion, agenda.intervalo, None, false)
        .into_iter()
        .map(crate::comm::time::format_minutos)
        .collect();
    Ok((citas, libres))
}
