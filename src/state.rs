use std::future::{ready, Ready};
use std::sync::Arc;

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use sqlx::SqlitePool;

use crate::conf::AppConfiguration;
use crate::error::AppError;

/// 共享应用状态 / Shared application state injected as `web::Data<AppState>`
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub config: Arc<AppConfiguration>,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: AppConfiguration) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    /// 初始化数据库：建表并写入默认配置
    pub async fn prepare(&self) -> crate::error::AppResult<()> {
        crate::db::migrate(&self.pool).await?;
        crate::modules::configuracion::service::ensure_seeded(&self.pool, &self.config).await?;
        Ok(())
    }
}

/// 请求头中标识操作人的字段
pub const ACTOR_HEADER: &str = "X-Usuario-Id";

/// 操作人提取器 / Acting user, taken from the `X-Usuario-Id` header.
///
/// Only used to attribute audit entries; a missing header yields `Actor(None)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Actor(pub Option<i64>);

impl FromRequest for Actor {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let actor = match req.headers().get(ACTOR_HEADER) {
            None => Ok(Actor(None)),
            Some(value) => value
                .to_str()
                .ok()
                .and_then(|v| v.trim().parse::<i64>().ok())
                .map(|id| Actor(Some(id)))
                .ok_or_else(|| AppError::validation(ACTOR_HEADER, "debe ser un id numérico")),
        };
        ready(actor)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::*;
    use crate::conf::DatabaseConfig;

    /// 内存数据库测试状态 / Fresh in-memory state for tests
    pub async fn state() -> AppState {
        let mut config = AppConfiguration::default();
        config.database = DatabaseConfig {
            url: "sqlite::memory:".to_string(),
            pool: 1,
        };
        let pool = crate::db::connect(&config.database).await.unwrap();
        let state = AppState::new(pool, config);
        state.prepare().await.unwrap();
        state
    }

    /// 挂载全部路由的测试应用
    #[macro_export]
    macro_rules! test_app {
        ($state:expr) => {
            actix_web::test::init_service(
                actix_web::App::new()
                    .app_data(actix_web::web::Data::new($state.clone()))
                    .app_data(
                        actix_web::web::JsonConfig::default()
                            .error_handler($crate::error::json_error_handler),
                    )
                    .app_data(
                        actix_web::web::QueryConfig::default()
                            .error_handler($crate::error::query_error_handler),
                    )
                    .app_data(
                        actix_web::web::PathConfig::default()
                            .error_handler($crate::error::path_error_handler),
                    )
                    .configure($crate::route_registry::configure_all),
            )
            .await
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[actix_web::test]
    async fn actor_header_is_optional() {
        let req = TestRequest::default().to_http_request();
        let actor = Actor::extract(&req).await.unwrap();
        assert_eq!(actor, Actor(None));

        let req = TestRequest::default()
            .insert_header((ACTOR_HEADER, "7"))
            .to_http_request();
        assert_eq!(Actor::extract(&req).await.unwrap(), Actor(Some(7)));

        let req = TestRequest::default()
            .insert_header((ACTOR_HEADER, "abc"))
            .to_http_request();
        assert!(Actor::extract(&req).await.is_err());
    }
}
