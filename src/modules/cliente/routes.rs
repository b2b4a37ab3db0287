use actix_web::{delete, get, patch, post, web, HttpResponse, Result};

use super::models::{Cliente, ClienteFilter, CreateCliente, UpdateCliente};
use super::service;
use crate::modules::cita::models::CitaDetalle;
use crate::state::{Actor, AppState};

/// 客户列表
#[utoipa::path(
    get,
    path = "/api/clientes",
    tag = "Clientes",
    params(ClienteFilter),
    responses((status = 200, body = [Cliente]))
)]
#[get("")]
pub async fn listar(
    state: web::Data<AppState>,
    filter: web::Query<ClienteFilter>,
) -> Result<HttpResponse> {
    let clientes = service::listar(&state.pool, &filter).await?;
    Ok(HttpResponse::Ok().json(clientes))
}

/// 创建客户
#[utoipa::path(
    post,
    path = "/api/clientes",
    tag = "Clientes",
    request_body = CreateCliente,
    responses(
        (status = 201, body = Cliente),
        (status = 400, description = "Datos inválidos")
    )
)]
#[post("")]
pub async fn crear(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<CreateCliente>,
) -> Result<HttpResponse> {
    let cliente = service::crear(&state.pool, actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(cliente))
}

#[utoipa::path(
    get,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = i64, Path)),
    responses((status = 200, body = Cliente), (status = 404))
)]
#[get("/{id}")]
pub async fn obtener(state: web::Data<AppState>, id: web::Path<i64>) -> Result<HttpResponse> {
    let cliente = service::obtener(&state.pool, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(cliente))
}

#[utoipa::path(
    patch,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = i64, Path)),
    request_body = UpdateCliente,
    responses((status = 200, body = Cliente), (status = 404))
)]
#[patch("/{id}")]
pub async fn actualizar(
    state: web::Data<AppState>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<UpdateCliente>,
) -> Result<HttpResponse> {
    let cliente = service::actualizar(&state.pool, actor, id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(cliente))
}

/// 停用客户（软删除）
#[utoipa::path(
    delete,
    path = "/api/clientes/{id}",
    tag = "Clientes",
    params(("id" = i64, Path)),
    responses((status = 200, body = Cliente), (status = 404))
)]
#[delete("/{id}")]
pub async fn eliminar(
    state: web::Data<AppState>,
    actor: Actor,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let cliente = service::eliminar(&state.pool, actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(cliente))
}

/// 客户预约历史
#[utoipa::path(
    get,
    path = "/api/clientes/{id}/citas",
    tag = "Clientes",
    params(("id" = i64, Path)),
    responses((status = 200, body = [CitaDetalle]), (status = 404))
)]
#[get("/{id}/citas")]
pub async fn citas(state: web::Data<AppState>, id: web::Path<i64>) -> Result<HttpResponse> {
    let historial = service::historial(&state.pool, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(historial))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/clientes")
            .service(listar)
            .service(crear)
            .service(citas)
            .service(obtener)
            .service(actualizar)
            .service(eliminar),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::state::{testing, ACTOR_HEADER};

    #[actix_web::test]
    async fn crud_with_soft_delete() {
        let state = testing::state().await;
        let app = crate::test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/clientes")
            .insert_header((ACTOR_HEADER, "3"))
            .set_json(json!({"nombre": "Lucía", "apellido": "Gómez", "telefono": "555-1234"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let created: Value = test::read_body_json(resp).await;
        let id = created["id"].as_i64().unwrap();
        assert_eq!(created["activo"], true);

        let req = test::TestRequest::patch()
            .uri(&format!("/api/clientes/{}", id))
            .set_json(json!({"telefono": null, "notas": "alergia al látex"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["telefono"], Value::Null);
        assert_eq!(body["notas"], "alergia al látex");
        assert_eq!(body["apellido"], "Gómez");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/clientes/{}", id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["activo"], false);

        let req = test::TestRequest::get().uri("/api/clientes").to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert!(body.is_empty());

        let req = test::TestRequest::get()
            .uri("/api/clientes?incluirInactivos=true")
            .to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 1);

        let req = test::TestRequest::get()
            .uri(&format!("/api/audit-logs?entidad=Cliente&entidadId={}", id))
            .to_request();
        let logs: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(logs.len(), 3);
        assert_eq!(logs[2]["usuarioId"], 3);
        assert_eq!(logs[0]["accion"], "eliminar");
    }

    #[actix_web::test]
    async fn search_matches_any_contact_field() {
        let state = testing::state().await;
        let app = crate::test_app!(state);

        for body in [
            json!({"nombre": "Marta", "email": "marta@example.com"}),
            json!({"nombre": "Julia", "telefono": "11-4000"}),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/clientes")
                .set_json(body)
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get().uri("/api/clientes?q=example").to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 1);
        assert_eq!(body[0]["nombre"], "Marta");

        let req = test::TestRequest::get().uri("/api/clientes?q=4000").to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body[0]["nombre"], "Julia");
    }

    #[actix_web::test]
    async fn validation_and_missing_records() {
        let state = testing::state().await;
        let app = crate::test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/clientes")
            .set_json(json!({"nombre": ""}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["error"].as_str().unwrap().starts_with("nombre"));

        let req = test::TestRequest::get().uri("/api/clientes/99").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::get().uri("/api/clientes/99/citas").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
