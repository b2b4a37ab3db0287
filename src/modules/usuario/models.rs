use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::comm::patch::merge;
use crate::modules::audit_log::Auditable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Rol {
    Admin,
    Empleado,
}

impl Default for Rol {
    fn default() -> Self {
        Rol::Empleado
    }
}

impl std::str::FromStr for Rol {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Rol::Admin),
            "empleado" => Ok(Rol::Empleado),
            other => Err(format!("rol desconocido '{}'", other)),
        }
    }
}

/// 系统用户 / Staff account; credentials are never serialized
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: i64,
    pub nombre: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    #[serde(skip)]
    pub password_salt: String,
    pub rol: Rol,
    pub activo: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Usuario {
    pub fn es_admin_activo(&self) -> bool {
        self.activo && self.rol == Rol::Admin
    }
}

impl Auditable for Usuario {
    const ENTIDAD: &'static str = "Usuario";

    fn audit_id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUsuario {
    #[validate(length(min = 1, max = 120, message = "el nombre es obligatorio"))]
    pub nombre: String,
    #[validate(email(message = "email inválido"))]
    pub email: String,
    #[validate(length(min = 6, message = "la contraseña debe tener al menos 6 caracteres"))]
    pub password: String,
    #[serde(default)]
    pub rol: Rol,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUsuario {
    #[validate(length(min = 1, max = 120, message = "el nombre no puede estar vacío"))]
    pub nombre: Option<String>,
    #[validate(email(message = "email inválido"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "la contraseña debe tener al menos 6 caracteres"))]
    pub password: Option<String>,
    pub rol: Option<Rol>,
    pub activo: Option<bool>,
}

impl UpdateUsuario {
    /// 合并除密码外的字段
    pub fn apply(&mut self, u: &mut Usuario) {
        merge(&mut u.nombre, self.nombre.take());
        merge(&mut u.email, self.email.take().map(|e| e.trim().to_lowercase()));
        merge(&mut u.rol, self.rol.take());
        merge(&mut u.activo, self.activo.take());
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct UsuarioFilter {
    pub rol: Option<Rol>,
    #[serde(default)]
    pub incluir_inactivos: bool,
}
