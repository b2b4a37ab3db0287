use chrono::Local;
use sqlx::{Sqlite, SqlitePool, Transaction};
use validator::Validate;

use super::models::{CreatePago, MetodoPago, Pago, PagoFilter, ResumenPagos, ResumenQuery, UpdatePago};
use super::repo;
use crate::error::{AppError, AppResult};
use crate::modules::audit_log::{self, Accion};
use crate::modules::cita::{self, models::EstadoCita};
use crate::modules::cuenta_bancaria;
use crate::state::Actor;

pub async fn obtener(pool: &SqlitePool, id: i64) -> AppResult<Pago> {
    repo::find(pool, id)
        .await?
        .ok_or_else(|| AppError::not_found("Pago"))
}

pub async fn listar(pool: &SqlitePool, filter: &PagoFilter) -> AppResult<Vec<Pago>> {
    Ok(repo::list(pool, filter).await?)
}

pub async fn resumen(pool: &SqlitePool, q: &ResumenQuery) -> AppResult<ResumenPagos> {
    if let (Some(d), Some(h)) = (q.desde, q.hasta) {
        if d > h {
            return Err(AppError::validation("desde", "debe ser anterior a hasta"));
        }
    }
    let por_metodo = repo::resumen(pool, q).await?;
    Ok(ResumenPagos::from_metodos(q, por_metodo))
}

/// 转账必须指向启用的账户（省略时取默认账户）；其他方式不得携带账户
async fn resolver_cuenta(
    tx: &mut Transaction<'_, Sqlite>,
    metodo: MetodoPago,
    cuenta_id: Option<i64>,
) -> AppResult<Option<i64>> {
    match (metodo, cuenta_id) {
        (MetodoPago::Transferencia, Some(id)) => {
            let cuenta = cuenta_bancaria::repo::find(&mut **tx, id)
                .await?
                .ok_or_else(|| AppError::not_found("Cuenta bancaria"))?;
            if !cuenta.activa {
                return Err(AppError::validation(
                    "cuentaBancariaId",
                    "la cuenta bancaria está inactiva",
                ));
            }
            Ok(Some(cuenta.id))
        }
        (MetodoPago::Transferencia, None) => cuenta_bancaria::repo::find_predeterminada(&mut **tx)
            .await?
            .map(|c| Some(c.id))
            .ok_or_else(|| {
                AppError::validation(
                    "cuentaBancariaId",
                    "no hay una cuenta bancaria predeterminada activa para transferencias",
                )
            }),
        (_, Some(_)) => Err(AppError::validation(
            "cuentaBancariaId",
            "solo los pagos por transferencia llevan cuenta bancaria",
        )),
        (_, None) => Ok(None),
    }
}

/// 登记付款并将预约标记为已完成（同一事务）
pub async fn crear(pool: &SqlitePool, actor: Actor, dto: CreatePago) -> AppResult<Pago> {
    dto.validate()?;

    let mut tx = pool.begin().await?;
    cita::repo::find(&mut *tx, dto.cita_id)
        .await?
        .ok_or_else(|| AppError::not_found("Cita"))?;
    let cuenta_bancaria_id = resolver_cuenta(&mut tx, dto.metodo, dto.cuenta_bancaria_id).await?;

    let mut pago = Pago {
        id: 0,
        cita_id: dto.cita_id,
        monto: dto.monto,
        metodo: dto.metodo,
        cuenta_bancaria_id,
        fecha: dto.fecha.unwrap_or_else(|| Local::now().date_naive()),
        referencia: dto.referencia,
        notas: dto.notas,
        created_at: crate::db::now(),
    };
    pago.id = repo::insert(&mut *tx, &pago).await?;
    cita::repo::set_estado(&mut *tx, pago.cita_id, EstadoCita::Completada).await?;
    tx.commit().await?;

    tracing::info!(pago = pago.id, cita = pago.cita_id, "pago registrado, cita completada");
    audit_log::registrar(pool, actor, Accion::Crear, &pago).await;
    Ok(pago)
}

pub async fn actualizar(
    pool: &SqlitePool,
    actor: Actor,
    id: i64,
    patch: UpdatePago,
) -> AppResult<Pago> {
    patch.validate()?;

    let mut tx = pool.begin().await?;
    let mut pago = repo::find(&mut *tx, id)
        .await?
        .ok_or_else(|| AppError::not_found("Pago"))?;
    let cuenta_explicita = patch.cuenta_bancaria_id.is_some();
    let metodo_cambia = patch.metodo.is_some() || cuenta_explicita;
    patch.apply(&mut pago);
    if metodo_cambia {
        if pago.metodo != MetodoPago::Transferencia && !cuenta_explicita {
            pago.cuenta_bancaria_id = None;
        }
        pago.cuenta_bancaria_id = resolver_cuenta(&mut tx, pago.metodo, pago.cuenta_bancaria_id)
            .await?;
    }
    repo::update(&mut *tx, &pago).await?;
    tx.commit().await?;

    audit_log::registrar(pool, actor, Accion::Actualizar, &pago).await;
    Ok(pago)
}

pub async fn eliminar(pool: &SqlitePool, actor: Actor, id: i64) -> AppResult<()> {
    let pago = obtener(pool, id).await?;
    repo::delete(pool, id).await?;
    audit_log::registrar(pool, actor, Accion::Eliminar, &pago).await;
    Ok(())
}
