/// 通用接口：健康检查与 OpenAPI 文档
pub mod health;
pub mod swagger;
