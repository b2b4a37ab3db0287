/// 服务项目模块 / Services offered by the salon

pub mod models;
pub mod repo;
pub mod routes;
pub mod service;
