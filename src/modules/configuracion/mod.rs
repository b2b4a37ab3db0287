/// 营业配置模块 / Business configuration

pub mod models;
pub mod repo;
pub mod routes;
pub mod service;
