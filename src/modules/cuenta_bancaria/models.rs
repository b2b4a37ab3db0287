use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::comm::patch::{merge, nullable};
use crate::modules::audit_log::Auditable;

/// 收款银行账户 / Bank account that receives transfers
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CuentaBancaria {
    pub id: i64,
    pub banco: String,
    pub titular: String,
    pub numero_cuenta: String,
    pub tipo_cuenta: Option<String>,
    pub alias: Option<String>,
    pub predeterminada: bool,
    pub activa: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Auditable for CuentaBancaria {
    const ENTIDAD: &'static str = "CuentaBancaria";

    fn audit_id(&self) -> i64 {
        self.id
    }
}

/// 单个账户详情，附带关联付款数
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CuentaBancariaDetalle {
    #[serde(flatten)]
    pub cuenta: CuentaBancaria,
    pub pagos_count: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCuentaBancaria {
    #[validate(length(min = 1, max = 120, message = "el banco es obligatorio"))]
    pub banco: String,
    #[validate(length(min = 1, max = 120, message = "el titular es obligatorio"))]
    pub titular: String,
    #[validate(length(min = 1, max = 64, message = "el número de cuenta es obligatorio"))]
    pub numero_cuenta: String,
    pub tipo_cuenta: Option<String>,
    pub alias: Option<String>,
    #[serde(default)]
    pub predeterminada: bool,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCuentaBancaria {
    #[validate(length(min = 1, max = 120, message = "el banco no puede estar vacío"))]
    pub banco: Option<String>,
    #[validate(length(min = 1, max = 120, message = "el titular no puede estar vacío"))]
    pub titular: Option<String>,
    #[validate(length(min = 1, max = 64, message = "el número de cuenta no puede estar vacío"))]
    pub numero_cuenta: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub tipo_cuenta: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub alias: Option<Option<String>>,
    pub predeterminada: Option<bool>,
    pub activa: Option<bool>,
}

impl UpdateCuentaBancaria {
    pub fn apply(self, c: &mut CuentaBancaria) {
        merge(&mut c.banco, self.banco);
        merge(&mut c.titular, self.titular);
        merge(&mut c.numero_cuenta, self.numero_cuenta);
        merge(&mut c.tipo_cuenta, self.tipo_cuenta);
        merge(&mut c.alias, self.alias);
        merge(&mut c.predeterminada, self.predeterminada);
        merge(&mut c.activa, self.activa);
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CuentaBancariaFilter {
    pub activa: Option<bool>,
}
