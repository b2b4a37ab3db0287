/// 银行账户模块 / Bank accounts for transfer payments

pub mod models;
pub mod repo;
pub mod routes;
pub mod service;
