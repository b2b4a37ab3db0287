use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::comm::patch::{merge, nullable};
use crate::modules::audit_log::Auditable;

/// 预约状态 / Appointment status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
pub enum EstadoCita {
    Pendiente,
    Confirmada,
    Completada,
    Cancelada,
    NoAsistio,
}

impl Default for EstadoCita {
    fn default() -> Self {
        EstadoCita::Pendiente
    }
}

impl EstadoCita {
    /// 是否占用时间段（取消与爽约不占用）
    pub fn ocupa_horario(self) -> bool {
        !matches!(self, EstadoCita::Cancelada | EstadoCita::NoAsistio)
    }
}

/// 预约 / Appointment row
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cita {
    pub id: i64,
    pub cliente_id: i64,
    pub servicio_id: Option<i64>,
    /// 负责的员工
    pub usuario_id: Option<i64>,
    pub fecha: NaiveDate,
    #[serde(with = "crate::comm::time::hora")]
    #[schema(value_type = String, example = "10:30")]
    pub hora: NaiveTime,
    /// 覆盖服务默认时长（分钟）
    pub duracion: Option<i64>,
    pub estado: EstadoCita,
    pub precio: Option<f64>,
    pub notas: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Auditable for Cita {
    const ENTIDAD: &'static str = "Cita";

    fn audit_id(&self) -> i64 {
        self.id
    }
}

/// 列表行：附带客户与服务名称
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CitaDetalle {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub cita: Cita,
    pub cliente_nombre: String,
    pub servicio_nombre: Option<String>,
}

/// 计算可用性所需的当天预约信息
#[derive(Debug, Clone, FromRow)]
pub struct CitaAgenda {
    pub id: i64,
    pub hora: NaiveTime,
    pub duracion: Option<i64>,
    pub servicio_duracion: Option<i64>,
    pub estado: EstadoCita,
    pub cliente_nombre: String,
    pub servicio_nombre: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCita {
    pub cliente_id: i64,
    pub servicio_id: Option<i64>,
    pub usuario_id: Option<i64>,
    pub fecha: NaiveDate,
    #[serde(with = "crate::comm::time::hora")]
    #[schema(value_type = String, example = "10:30")]
    pub hora: NaiveTime,
    #[validate(range(min = 1, max = 1440, message = "la duración debe estar entre 1 y 1440 minutos"))]
    pub duracion: Option<i64>,
    #[serde(default)]
    pub estado: EstadoCita,
    #[validate(range(min = 0.0, message = "el precio no puede ser negativo"))]
    pub precio: Option<f64>,
    pub notas: Option<String>,
    /// 仅对本次预约放宽重叠限制
    pub permitir_superposicion: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCita {
    pub cliente_id: Option<i64>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub servicio_id: Option<Option<i64>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<i64>)]
    pub usuario_id: Option<Option<i64>>,
    pub fecha: Option<NaiveDate>,
    #[serde(default, with = "crate::comm::time::hora_opcional")]
    #[schema(value_type = Option<String>, example = "10:30")]
    pub hora: Option<NaiveTime>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(range(min = 1, max = 1440, message = "la duración debe estar entre 1 y 1440 minutos"))]
    #[schema(value_type = Option<i64>)]
    pub duracion: Option<Option<i64>>,
    pub estado: Option<EstadoCita>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(range(min = 0.0, message = "el precio no puede ser negativo"))]
    #[schema(value_type = Option<f64>)]
    pub precio: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub notas: Option<Option<String>>,
    pub permitir_superposicion: Option<bool>,
}

impl UpdateCita {
    pub fn apply(self, c: &mut Cita) {
        merge(&mut c.cliente_id, self.cliente_id);
        merge(&mut c.servicio_id, self.servicio_id);
        merge(&mut c.usuario_id, self.usuario_id);
        merge(&mut c.fecha, self.fecha);
        merge(&mut c.hora, self.hora);
        merge(&mut c.duracion, self.duracion);
        merge(&mut c.estado, self.estado);
        merge(&mut c.precio, self.precio);
        merge(&mut c.notas, self.notas);
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CitaFilter {
    pub fecha: Option<NaiveDate>,
    pub desde: Option<NaiveDate>,
    pub hasta: Option<NaiveDate>,
    pub cliente_id: Option<i64>,
    pub estado: Option<EstadoCita>,
}

/// GET /api/citas/disponibilidad
#[derive(Debug, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DisponibilidadQuery {
    pub fecha: NaiveDate,
    #[serde(with = "crate::comm::time::hora")]
    #[param(value_type = String, example = "10:30")]
    pub hora: NaiveTime,
    pub servicio_id: Option<i64>,
    /// 分钟；优先于服务时长
    #[validate(range(min = 1, max = 1440, message = "la duración debe estar entre 1 y 1440 minutos"))]
    pub duracion: Option<i64>,
    pub permitir_superposicion: Option<bool>,
    /// 修改预约时排除自身
    pub excluir_cita_id: Option<i64>,
}

/// 与候选时间段重叠的预约
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Conflicto {
    pub cita_id: i64,
    pub hora: String,
    pub hora_fin: String,
    pub cliente_nombre: String,
    pub servicio_nombre: Option<String>,
}

/// 可用性检查结果 / Availability check result
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Disponibilidad {
    pub disponible: bool,
    pub dentro_de_horario: bool,
    pub conflictos: Vec<Conflicto>,
    pub superposiciones: Vec<Conflicto>,
    pub sugerencias: Vec<String>,
    pub duracion_servicio: u32,
    pub intervalo_configurado: u32,
    pub tiempo_total_ocupado: u32,
}
