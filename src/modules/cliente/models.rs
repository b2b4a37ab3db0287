use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::comm::patch::{merge, nullable};
use crate::modules::audit_log::Auditable;

lazy_static! {
    /// 数字、空格、括号与连字符，可带国际前缀 `+`
    static ref TELEFONO: Regex = Regex::new(r"^\+?[0-9][0-9 ()\-]{5,19}$").unwrap();
}

/// 客户 / Client record
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cliente {
    pub id: i64,
    pub nombre: String,
    pub apellido: Option<String>,
    pub telefono: Option<String>,
    pub email: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub direccion: Option<String>,
    pub notas: Option<String>,
    pub foto_url: Option<String>,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Cliente {
    pub fn nombre_completo(&self) -> String {
        match &self.apellido {
            Some(a) if !a.trim().is_empty() => format!("{} {}", self.nombre, a),
            _ => self.nombre.clone(),
        }
    }
}

impl Auditable for Cliente {
    const ENTIDAD: &'static str = "Cliente";

    fn audit_id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCliente {
    #[validate(length(min = 1, max = 120, message = "el nombre es obligatorio"))]
    pub nombre: String,
    pub apellido: Option<String>,
    #[validate(regex(path = *TELEFONO, message = "teléfono inválido"))]
    pub telefono: Option<String>,
    #[validate(email(message = "email inválido"))]
    pub email: Option<String>,
    pub fecha_nacimiento: Option<NaiveDate>,
    pub direccion: Option<String>,
    pub notas: Option<String>,
    pub foto_url: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCliente {
    #[validate(length(min = 1, max = 120, message = "el nombre no puede estar vacío"))]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub apellido: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(regex(path = *TELEFONO, message = "teléfono inválido"))]
    #[schema(value_type = Option<String>)]
    pub telefono: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[validate(email(message = "email inválido"))]
    #[schema(value_type = Option<String>)]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>, format = Date)]
    pub fecha_nacimiento: Option<Option<NaiveDate>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub direccion: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub notas: Option<Option<String>>,
    #[serde(default, deserialize_with = "nullable")]
    #[schema(value_type = Option<String>)]
    pub foto_url: Option<Option<String>>,
    pub activo: Option<bool>,
}

impl UpdateCliente {
    pub fn apply(self, c: &mut Cliente) {
        merge(&mut c.nombre, self.nombre);
        merge(&mut c.apellido, self.apellido);
        merge(&mut c.telefono, self.telefono);
        merge(&mut c.email, self.email);
        merge(&mut c.fecha_nacimiento, self.fecha_nacimiento);
        merge(&mut c.direccion, self.direccion);
        merge(&mut c.notas, self.notas);
        merge(&mut c.foto_url, self.foto_url);
        merge(&mut c.activo, self.activo);
    }
}

/// 列表过滤条件
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ClienteFilter {
    /// 模糊匹配 nombre / apellido / telefono / email
    pub q: Option<String>,
    #[serde(default)]
    pub incluir_inactivos: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nombre_completo_skips_blank_apellido() {
        let mut c = Cliente {
            id: 1,
            nombre: "Ana".into(),
            apellido: Some("Pérez".into()),
            telefono: None,
            email: None,
            fecha_nacimiento: None,
            direccion: None,
            notas: None,
            foto_url: None,
            activo: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        assert_eq!(c.nombre_completo(), "Ana Pérez");
        c.apellido = Some("  ".into());
        assert_eq!(c.nombre_completo(), "Ana");
    }

    #[test]
    fn patch_validates_nested_email() {
        let patch: UpdateCliente = serde_json::from_str(r#"{"email": "no-es-email"}"#).unwrap();
        assert!(patch.validate().is_err());
        let patch: UpdateCliente = serde_json::from_str(r#"{"email": null}"#).unwrap();
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn telefono_format() {
        let ok: UpdateCliente = serde_json::from_str(r#"{"telefono": "+54 (11) 4555-1234"}"#).unwrap();
        assert!(ok.validate().is_ok());
        let bad: UpdateCliente = serde_json::from_str(r#"{"telefono": "llamar tarde"}"#).unwrap();
        assert!(bad.validate().is_err());
    }
}
