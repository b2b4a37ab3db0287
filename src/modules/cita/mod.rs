/// 预约模块 / Appointments and slot availability

pub mod cmd;
pub mod disponibilidad;
pub mod models;
pub mod repo;
pub mod routes;
pub mod service;
