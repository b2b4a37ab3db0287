use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

/// 统一的应用错误类型
#[derive(Error, Debug)]
pub enum AppError {
    #[error("配置错误: {0}")]
    Config(#[from] crate::comm::config::ConfigError),

    #[error("{field}: {message}")]
    Validation { field: String, message: String },

    #[error("{resource} no encontrado")]
    NotFound { resource: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Error de base de datos: {message}")]
    Database { message: String },

    #[error("Error interno: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// 创建验证错误
    pub fn validation<T: Into<String>, U: Into<String>>(field: T, message: U) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// 创建资源未找到错误
    pub fn not_found<T: Into<String>>(resource: T) -> Self {
        Self::NotFound {
            resource: resource.into(),
        }
    }

    /// 创建冲突错误（409）
    pub fn conflict<T: Into<String>>(message: T) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    /// 创建数据库错误
    pub fn database<T: Into<String>>(message: T) -> Self {
        Self::Database {
            message: message.into(),
        }
    }

    /// 获取错误代码
    pub fn error_code(&self) -> i32 {
        match self {
            AppError::Config(_) => 1001,
            AppError::Validation { .. } => 1004,
            AppError::Database { .. } => 1006,
            AppError::NotFound { .. } => 1009,
            AppError::Conflict { .. } => 1010,
            AppError::Internal(_) => 1000,
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::RowNotFound => AppError::not_found("Registro"),
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::conflict(format!("Registro duplicado: {}", db.message()))
            }
            sqlx::Error::Database(db) if db.is_foreign_key_violation() => {
                AppError::validation("referencia", db.message().to_string())
            }
            _ => AppError::database(e.to_string()),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));
        match fields.first() {
            Some((field, errs)) => {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                    .unwrap_or_else(|| "valor inválido".to_string());
                AppError::validation(field.to_string(), message)
            }
            None => AppError::validation("body", errors.to_string()),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::Config(_) | AppError::Database { .. } | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        // 5xx 详情只写日志，响应体使用固定文案
        let message = if status.is_server_error() {
            tracing::error!(code = self.error_code(), "Internal error: {}", self);
            PUBLIC_SERVER_ERROR.to_string()
        } else {
            let message = self.to_string();
            tracing::info!(code = self.error_code(), "Client error: {}", message);
            message
        };

        HttpResponse::build(status).json(json!({
            "error": message,
            "code": self.error_code(),
        }))
    }
}

/// 服务端错误对外返回的文案
pub const PUBLIC_SERVER_ERROR: &str = "Error interno del servidor";

/// 应用结果类型
pub type AppResult<T> = Result<T, AppError>;

/// JSON / Query / Path 解析失败时统一返回 `{error}` 结构
pub fn json_error_handler(
    err: actix_web::error::JsonPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    AppError::validation("body", err.to_string()).into()
}

pub fn query_error_handler(
    err: actix_web::error::QueryPayloadError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    AppError::validation("query", err.to_string()).into()
}

pub fn path_error_handler(
    err: actix_web::error::PathError,
    _req: &actix_web::HttpRequest,
) -> actix_web::Error {
    AppError::validation("path", err.to_string()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::MessageBody;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AppError::not_found("Cliente").status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::conflict("ocupado").status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::validation("monto", "debe ser positivo").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AppError::database("disk I/O").status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_row_not_found_maps_to_404() {
        let e: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(e.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_error_body_shape() {
        let resp = AppError::not_found("Cita").error_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let bytes = resp.into_body().try_into_bytes().unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], "Cita no encontrado");
        assert_eq!(body["code"], 1009);
    }

    #[test]
    fn test_server_error_body_hides_detail() {
        let resp = AppError::database("disk I/O error at /var/lib/salon.db").error_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let bytes = resp.into_body().try_into_bytes().unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], PUBLIC_SERVER_ERROR);
        assert_eq!(body["code"], 1006);
        assert!(!String::from_utf8_lossy(&bytes).contains("salon.db"));

        let resp = AppError::Internal(anyhow::anyhow!("pool timed out")).error_response();
        let bytes = resp.into_body().try_into_bytes().unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], PUBLIC_SERVER_ERROR);
        assert_eq!(body["code"], 1000);
    }
}
