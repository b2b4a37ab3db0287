use actix_web::HttpResponse;
use serde::Serialize;
use utoipa::ToSchema;

// 物理删除成功的响应体
// Body returned by hard deletes
#[derive(Debug, Serialize, ToSchema)]
pub struct Eliminado {
    pub success: bool,
}

// 200 `{"success": true}`
pub fn eliminado() -> HttpResponse {
    HttpResponse::Ok().json(Eliminado { success: true })
}
