use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::comm::patch::{merge, nullable};
use crate::modules::audit_log::Auditable;

/// 服务项目 / Salon service
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Servicio {
    pub id: i64,
    pub nombre: String,
    pub descripcion: Option<String>,
    pub categoria: Option<String>,
    /// 时长（分钟）
    pub duracion: i64,
    pub precio: f64,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Auditable for Servicio {
    const ENTIDAD: &'static str = "Servicio";

    fn audit_id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateServicio {
    #[validate(length(min = 1, max = 120, message = "el nombre es obligatorio"))]
    pub nombre: String,
    pub descripcion: Option<String>,
    pub categoria: Option<String>,
    #[validate(range(min = 1, max = 1440, message = "la duración debe ser mayor a 0"))]
    pub duracion: i64,
    #[validate(range(min = 0.0, message = "el precio no puede ser negativo"))]
    #[serde(default)]
    pub precio: f64,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateServicio {
    #[validate(length(min = 1, max = 120, message = "el nombre no puede estar vacío"))]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub descripcion: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub categoria: Option<Option<String>>,
    #[validate(range(min = 1, max = 1440, message = "la duración debe ser mayor a 0"))]
    pub duracion: Option<i64>,
    #[validate(range(min = 0.0, message = "el precio no puede ser negativo"))]
    pub precio: Option<f64>,
    pub activo: Option<bool>,
}

impl UpdateServicio {
    pub fn apply(self, s: &mut Servicio) {
        merge(&mut s.nombre, self.nombre);
        merge(&mut s.descripcion, self.descripcion);
        merge(&mut s.categoria, self.categoria);
        merge(&mut s.duracion, self.duracion);
        merge(&mut s.precio, self.precio);
        merge(&mut s.activo, self.activo);
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ServicioFilter {
    pub categoria: Option<String>,
    #[serde(default)]
    pub incluir_inactivos: bool,
}
