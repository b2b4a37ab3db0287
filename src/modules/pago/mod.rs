/// 付款模块 / Payments

pub mod models;
pub mod repo;
pub mod routes;
pub mod service;
