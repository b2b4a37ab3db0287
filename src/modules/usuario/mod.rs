/// 用户模块 / Staff accounts

pub mod cmd;
pub mod models;
pub mod password;
pub mod repo;
pub mod routes;
pub mod service;
