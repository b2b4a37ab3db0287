use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::comm::patch::{merge, nullable};
use crate::error::{AppError, AppResult};
use crate::modules::audit_log::Auditable;

/// 营业配置（单行表）/ Business configuration singleton
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Configuracion {
    pub nombre_negocio: String,
    pub telefono: Option<String>,
    pub direccion: Option<String>,
    pub moneda: String,
    /// 预约间隔（分钟）
    pub intervalo_citas: i64,
    #[serde(with = "crate::comm::time::hora")]
    #[schema(value_type = String, example = "09:00")]
    pub hora_apertura: NaiveTime,
    #[serde(with = "crate::comm::time::hora")]
    #[schema(value_type = String, example = "20:00")]
    pub hora_cierre: NaiveTime,
    pub permitir_superposicion: bool,
    pub updated_at: DateTime<Utc>,
}

impl Configuracion {
    pub fn validar_horario(&self) -> AppResult<()> {
        if self.hora_apertura >= self.hora_cierre {
            return Err(AppError::validation(
                "horaApertura",
                "la apertura debe ser anterior al cierre",
            ));
        }
        Ok(())
    }
}

impl Auditable for Configuracion {
    const ENTIDAD: &'static str = "Configuracion";

    fn audit_id(&self) -> i64 {
        1
    }
}

/// PATCH /api/configuracion
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateConfiguracion {
    #[validate(length(min = 1, max = 120, message = "el nombre no puede estar vacío"))]
    pub nombre_negocio: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub telefono: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub direccion: Option<Option<String>>,
    #[validate(length(min = 1, max = 8, message = "moneda inválida"))]
    pub moneda: Option<String>,
    #[validate(range(min = 5, max = 240, message = "el intervalo debe estar entre 5 y 240 minutos"))]
    pub intervalo_citas: Option<i64>,
    #[serde(default, with = "crate::comm::time::hora_opcional")]
    #[schema(value_type = Option<String>, example = "09:00")]
    pub hora_apertura: Option<NaiveTime>,
    #[serde(default, with = "crate::comm::time::hora_opcional")]
    #[schema(value_type = Option<String>, example = "20:00")]
    pub hora_cierre: Option<NaiveTime>,
    pub permitir_superposicion: Option<bool>,
}

impl UpdateConfiguracion {
    pub fn apply(self, c: &mut Configuracion) {
        merge(&mut c.nombre_negocio, self.nombre_negocio);
        merge(&mut c.telefono, self.telefono);
        merge(&mut c.direccion, self.direccion);
        merge(&mut c.moneda, self.moneda);
        merge(&mut c.intervalo_citas, self.intervalo_citas);
        merge(&mut c.hora_apertura, self.hora_apertura);
        merge(&mut c.hora_cierre, self.hora_cierre);
        merge(&mut c.permitir_superposicion, self.permitir_superposicion);
    }
}

/// 预约计算所需参数 / Scheduling parameters used by the availability check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Agenda {
    pub intervalo: u32,
    pub apertura: NaiveTime,
    pub cierre: NaiveTime,
    pub permitir_superposicion: bool,
    pub max_sugerencias: usize,
}

impl Agenda {
    pub fn from_configuracion(c: &Configuracion, max_sugerencias: usize) -> Self {
        Self {
            intervalo: u32::try_from(c.intervalo_citas).unwrap_or(1).max(1),
            apertura: c.hora_apertura,
            cierre: c.hora_cierre,
            permitir_superposicion: c.permitir_superposicion,
            max_sugerencias,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Configuracion {
        Configuracion {
            nombre_negocio: "Salón".to_string(),
            telefono: Some("123".to_string()),
            direccion: None,
            moneda: "ARS".to_string(),
            intervalo_citas: 30,
            hora_apertura: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            hora_cierre: NaiveTime::from_hms_opt(20, 0, 0).unwrap(),
            permitir_superposicion: false,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn patch_merges_only_provided_fields() {
        let mut c = base();
        let patch: UpdateConfiguracion =
            serde_json::from_str(r#"{"intervaloCitas": 15, "telefono": null, "horaCierre": "19:30"}"#)
                .unwrap();
        patch.apply(&mut c);
        assert_eq!(c.intervalo_citas, 15);
        assert_eq!(c.telefono, None);
        assert_eq!(c.hora_cierre, NaiveTime::from_hms_opt(19, 30, 0).unwrap());
        assert_eq!(c.nombre_negocio, "Salón");
        assert_eq!(c.moneda, "ARS");
    }

    #[test]
    fn rejects_out_of_range_interval() {
        let patch: UpdateConfiguracion = serde_json::from_str(r#"{"intervaloCitas": 1}"#).unwrap();
        assert!(patch.validate().is_err());
    }

    #[test]
    fn horario_must_be_ordered() {
        let mut c = base();
        c.hora_apertura = NaiveTime::from_hms_opt(21, 0, 0).unwrap();
        assert!(c.validar_horario().is_err());
    }
}
