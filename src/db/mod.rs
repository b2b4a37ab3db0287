/// 数据库模块 / Database: pool construction, health and schema

pub mod pool;
pub mod query;
pub mod schema;

pub use pool::{check_health, connect};
pub use query::SelectBuilder;
pub use schema::migrate;

/// 当前 UTC 时间，所有 `created_at` / `updated_at` 使用此值
pub fn now() -> chrono::DateTime<chrono::Utc> {
    chrono::Utc::now()
}
