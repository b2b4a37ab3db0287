use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::comm::patch::{merge, nullable};
use crate::modules::audit_log::Auditable;

/// 付款方式 / Payment method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum MetodoPago {
    Efectivo,
    Tarjeta,
    Transferencia,
}

/// 付款记录 / Payment against an appointment
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Pago {
    pub id: i64,
    pub cita_id: i64,
    pub monto: f64,
    pub metodo: MetodoPago,
    pub cuenta_bancaria_id: Option<i64>,
    pub fecha: NaiveDate,
    pub referencia: Option<String>,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Auditable for Pago {
    const ENTIDAD: &'static str = "Pago";

    fn audit_id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePago {
    pub cita_id: i64,
    #[validate(range(exclusive_min = 0.0, message = "el monto debe ser mayor a 0"))]
    pub monto: f64,
    pub metodo: MetodoPago,
    /// 仅转账使用；省略时取默认账户
    pub cuenta_bancaria_id: Option<i64>,
    /// 默认当天
    pub fecha: Option<NaiveDate>,
    pub referencia: Option<String>,
    pub notas: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePago {
    #[validate(range(exclusive_min = 0.0, message = "el monto debe ser mayor a 0"))]
    pub monto: Option<f64>,
    pub metodo: Option<MetodoPago>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub cuenta_bancaria_id: Option<Option<i64>>,
    pub fecha: Option<NaiveDate>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub referencia: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub notas: Option<Option<String>>,
}

impl UpdatePago {
    pub fn apply(self, p: &mut Pago) {
        merge(&mut p.monto, self.monto);
        merge(&mut p.metodo, self.metodo);
        merge(&mut p.cuenta_bancaria_id, self.cuenta_bancaria_id);
        merge(&mut p.fecha, self.fecha);
        merge(&mut p.referencia, self.referencia);
        merge(&mut p.notas, self.notas);
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct PagoFilter {
    pub cita_id: Option<i64>,
    pub metodo: Option<MetodoPago>,
    pub desde: Option<NaiveDate>,
    pub hasta: Option<NaiveDate>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ResumenQuery {
    pub desde: Option<NaiveDate>,
    pub hasta: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumenMetodo {
    pub metodo: MetodoPago,
    pub total: f64,
    pub cantidad: i64,
}

/// 收款汇总 / Totals per payment method
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResumenPagos {
    pub desde: Option<NaiveDate>,
    pub hasta: Option<NaiveDate>,
    pub total: f64,
    pub cantidad: i64,
    pub por_metodo: Vec<ResumenMetodo>,
}

impl ResumenPagos {
    pub fn from_metodos(q: &ResumenQuery, por_metodo: Vec<ResumenMetodo>) -> Self {
        Self {
            desde: q.desde,
            hasta: q.hasta,
            total: por_metodo.iter().map(|m| m.total).sum(),
            cantidad: por_metodo.iter().map(|m| m.cantidad).sum(),
            por_metodo,
        }
    }
}
