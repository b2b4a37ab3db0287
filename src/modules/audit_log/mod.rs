/// 审计日志模块 / Append-only audit trail

pub mod models;
pub mod repo;
pub mod routes;
pub mod service;

pub use models::{Accion, Auditable};
pub use service::registrar;
