/// 商品与库存模块 / Products and stock

pub mod models;
pub mod repo;
pub mod routes;
pub mod service;
