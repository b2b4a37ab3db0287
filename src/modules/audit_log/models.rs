use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

/// 审计动作 / Audited action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum Accion {
    Crear,
    Actualizar,
    Eliminar,
}

/// 审计日志记录 / One audit trail entry
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuditLog {
    pub id: i64,
    pub usuario_id: Option<i64>,
    pub accion: Accion,
    pub entidad: String,
    pub entidad_id: Option<i64>,
    #[schema(value_type = Option<Object>)]
    pub detalles: Option<Json<serde_json::Value>>,
    pub created_at: DateTime<Utc>,
}

/// 列表过滤条件
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AuditFilter {
    pub entidad: Option<String>,
    pub entidad_id: Option<i64>,
    pub usuario_id: Option<i64>,
    /// 默认 100，最大 500
    pub limite: Option<i64>,
}

impl AuditFilter {
    pub const DEFAULT_LIMIT: i64 = 100;
    pub const MAX_LIMIT: i64 = 500;

    pub fn limit(&self) -> i64 {
        self.limite
            .unwrap_or(Self::DEFAULT_LIMIT)
            .clamp(1, Self::MAX_LIMIT)
    }
}

/// 可审计实体 / Entities that land in the audit trail
pub trait Auditable: Serialize {
    const ENTIDAD: &'static str;

    fn audit_id(&self) -> i64;
}
