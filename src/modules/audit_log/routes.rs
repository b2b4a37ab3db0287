use actix_web::{get, web, HttpResponse, Result};

use super::models::{AuditFilter, AuditLog};
use super::service;
use crate::state::AppState;

/// 审计日志列表
#[utoipa::path(
    get,
    path = "/api/audit-logs",
    tag = "AuditLog",
    params(AuditFilter),
    responses((status = 200, body = [AuditLog]))
)]
#[get("")]
pub async fn listar(
    state: web::Data<AppState>,
    filter: web::Query<AuditFilter>,
) -> Result<HttpResponse> {
    let logs = service::listar(&state.pool, &filter).await?;
    Ok(HttpResponse::Ok().json(logs))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/api/audit-logs").service(listar));
}

#[cfg(test)]
mod tests {
    use super::super::models::Accion;
    use super::super::service::registrar_raw;
    use crate::state::{testing, Actor};
    use actix_web::test;
    use serde_json::{json, Value};

    #[actix_web::test]
    async fn lists_newest_first_with_filters() {
        let state = testing::state().await;
        registrar_raw(&state.pool, Actor(Some(1)), Accion::Crear, "Cliente", Some(1), None).await;
        registrar_raw(
            &state.pool,
            Actor(None),
            Accion::Actualizar,
            "Cliente",
            Some(1),
            Some(json!({"nombre": "Ana"})),
        )
        .await;
        registrar_raw(&state.pool, Actor(Some(1)), Accion::Crear, "Producto", Some(4), None).await;

        let app = crate::test_app!(state);

        let req = test::TestRequest::get()
            .uri("/api/audit-logs?entidad=Cliente&entidadId=1")
            .to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 2);
        assert_eq!(body[0]["accion"], "actualizar");
        assert_eq!(body[0]["detalles"]["nombre"], "Ana");
        assert_eq!(body[1]["accion"], "crear");
        assert_eq!(body[1]["usuarioId"], 1);

        let req = test::TestRequest::get()
            .uri("/api/audit-logs?usuarioId=1&limite=1")
            .to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 1);
        assert_eq!(body[0]["entidad"], "Producto");
    }
}
