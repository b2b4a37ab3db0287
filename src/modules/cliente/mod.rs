/// 客户模块 / Clients

pub mod models;
pub mod repo;
pub mod routes;
pub mod service;
