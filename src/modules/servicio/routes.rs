use actix_web::{delete, get, patch, post, web, HttpResponse, Result};

use super::models::{CreateServicio, Servicio, ServicioFilter, UpdateServicio};
use super::service;
use crate::state::{Actor, AppState};

#[utoipa::path(
    get,
    path = "/api/servicios",
    tag = "Servicios",
    params(ServicioFilter),
    responses((status = 200, body = [Servicio]))
)]
#[get("")]
pub async fn listar(
    state: web::Data<AppState>,
    filter: web::Query<ServicioFilter>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service::listar(&state.pool, &filter).await?))
}

#[utoipa::path(
    post,
    path = "/api/servicios",
    tag = "Servicios",
    request_body = CreateServicio,
    responses((status = 201, body = Servicio), (status = 400))
)]
#[post("")]
pub async fn crear(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<CreateServicio>,
) -> Result<HttpResponse> {
    let servicio = service::crear(&state.pool, actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(servicio))
}

#[utoipa::path(
    get,
    path = "/api/servicios/{id}",
    tag = "Servicios",
    params(("id" = i64, Path)),
    responses((status = 200, body = Servicio), (status = 404))
)]
#[get("/{id}")]
pub async fn obtener(state: web::Data<AppState>, id: web::Path<i64>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service::obtener(&state.pool, id.into_inner()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/servicios/{id}",
    tag = "Servicios",
    params(("id" = i64, Path)),
    request_body = UpdateServicio,
    responses((status = 200, body = Servicio), (status = 404))
)]
#[patch("/{id}")]
pub async fn actualizar(
    state: web::Data<AppState>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<UpdateServicio>,
) -> Result<HttpResponse> {
    let servicio =
        service::actualizar(&state.pool, actor, id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(servicio))
}

/// 停用服务
#[utoipa::path(
    delete,
    path = "/api/servicios/{id}",
    tag = "Servicios",
    params(("id" = i64, Path)),
    responses((status = 200, body = Servicio), (status = 404))
)]
#[delete("/{id}")]
pub async fn eliminar(
    state: web::Data<AppState>,
    actor: Actor,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let servicio = service::eliminar(&state.pool, actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(servicio))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/servicios")
            .service(listar)
            .service(crear)
            .service(obtener)
            .service(actualizar)
            .service(eliminar),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::state::testing;

    #[actix_web::test]
    async fn filters_by_categoria_and_hides_inactive() {
        let state = testing::state().await;
        let app = crate::test_app!(state);

        let mut ids = Vec::new();
        for body in [
            json!({"nombre": "Corte", "categoria": "cabello", "duracion": 30, "precio": 5000}),
            json!({"nombre": "Tintura", "categoria": "cabello", "duracion": 90, "precio": 12000}),
            json!({"nombre": "Manicura", "categoria": "uñas", "duracion": 45}),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/servicios")
                .set_json(body)
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::CREATED);
            let created: Value = test::read_body_json(resp).await;
            ids.push(created["id"].as_i64().unwrap());
        }

        let req = test::TestRequest::get()
            .uri("/api/servicios?categoria=cabello")
            .to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 2);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/servicios/{}", ids[0]))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["activo"], false);

        let req = test::TestRequest::get().uri("/api/servicios").to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 2);

        // 停用后仍可按 id 读取
        let req = test::TestRequest::get()
            .uri(&format!("/api/servicios/{}", ids[0]))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn rejects_zero_duration() {
        let state = testing::state().await;
        let app = crate::test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/servicios")
            .set_json(json!({"nombre": "Nada", "duracion": 0}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/servicios")
            .set_json(json!({"nombre": "Brushing", "duracion": 40, "precio": 3000}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::patch()
            .uri(&format!("/api/servicios/{}", created["id"]))
            .set_json(json!({"precio": -1}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }
}
