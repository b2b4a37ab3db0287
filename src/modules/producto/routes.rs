use actix_web::{delete, get, patch, post, web, HttpResponse, Result};

use super::models::{AjusteStock, CreateProducto, Producto, ProductoFilter, UpdateProducto};
use super::service;
use crate::state::{Actor, AppState};

#[utoipa::path(
    get,
    path = "/api/productos",
    tag = "Productos",
    params(ProductoFilter),
    responses((status = 200, body = [Producto]))
)]
#[get("")]
pub async fn listar(
    state: web::Data<AppState>,
    filter: web::Query<ProductoFilter>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service::listar(&state.pool, &filter).await?))
}

#[utoipa::path(
    post,
    path = "/api/productos",
    tag = "Productos",
    request_body = CreateProducto,
    responses((status = 201, body = Producto), (status = 400))
)]
#[post("")]
pub async fn crear(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<CreateProducto>,
) -> Result<HttpResponse> {
    let producto = service::crear(&state.pool, actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(producto))
}

#[utoipa::path(
    get,
    path = "/api/productos/{id}",
    tag = "Productos",
    params(("id" = i64, Path)),
    responses((status = 200, body = Producto), (status = 404))
)]
#[get("/{id}")]
pub async fn obtener(state: web::Data<AppState>, id: web::Path<i64>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service::obtener(&state.pool, id.into_inner()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/productos/{id}",
    tag = "Productos",
    params(("id" = i64, Path)),
    request_body = UpdateProducto,
    responses((status = 200, body = Producto), (status = 404))
)]
#[patch("/{id}")]
pub async fn actualizar(
    state: web::Data<AppState>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<UpdateProducto>,
) -> Result<HttpResponse> {
    let producto =
        service::actualizar(&state.pool, actor, id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(producto))
}

#[utoipa::path(
    delete,
    path = "/api/productos/{id}",
    tag = "Productos",
    params(("id" = i64, Path)),
    responses((status = 200, body = Producto), (status = 404))
)]
#[delete("/{id}")]
pub async fn eliminar(
    state: web::Data<AppState>,
    actor: Actor,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    let producto = service::eliminar(&state.pool, actor, id.into_inner()).await?;
    Ok(HttpResponse::Ok().json(producto))
}

/// 库存调整
#[utoipa::path(
    post,
    path = "/api/productos/{id}/stock",
    tag = "Productos",
    params(("id" = i64, Path)),
    request_body = AjusteStock,
    responses(
        (status = 200, body = Producto),
        (status = 404),
        (status = 409, description = "Stock insuficiente")
    )
)]
#[post("/{id}/stock")]
pub async fn ajustar_stock(
    state: web::Data<AppState>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<AjusteStock>,
) -> Result<HttpResponse> {
    let producto =
        service::ajustar_stock(&state.pool, actor, id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(producto))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/productos")
            .service(listar)
            .service(crear)
            .service(ajustar_stock)
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
    async fn stock_adjustments_never_go_negative() {
        let state = testing::state().await;
        let app = crate::test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/productos")
            .set_json(json!({"nombre": "Shampoo", "marca": "Loreal", "precio": 4500, "stock": 5, "stockMinimo": 2}))
            .to_request();
        let created: Value = test::call_and_read_body_json(&app, req).await;
        let id = created["id"].as_i64().unwrap();

        let req = test::TestRequest::post()
            .uri(&format!("/api/productos/{}/stock", id))
            .set_json(json!({"cantidad": -4}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["stock"], 1);

        let req = test::TestRequest::post()
            .uri(&format!("/api/productos/{}/stock", id))
            .set_json(json!({"cantidad": -2}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);

        let req = test::TestRequest::get()
            .uri(&format!("/api/productos/{}", id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["stock"], 1);

        for cantidad in [i64::MIN, i64::MAX, -1_000_001] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/productos/{}/stock", id))
                .set_json(json!({ "cantidad": cantidad }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "cantidad={}", cantidad);
        }

        let req = test::TestRequest::get()
            .uri(&format!("/api/productos/{}", id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["stock"], 1);

        let req = test::TestRequest::post()
            .uri("/api/productos/999/stock")
            .set_json(json!({"cantidad": 1}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn bajo_stock_filter() {
        let state = testing::state().await;
        let app = crate::test_app!(state);

        for body in [
            json!({"nombre": "Acondicionador", "stock": 1, "stockMinimo": 3}),
            json!({"nombre": "Gel", "stock": 10, "stockMinimo": 3}),
            json!({"nombre": "Laca", "stock": 3, "stockMinimo": 3}),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/productos")
                .set_json(body)
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get()
            .uri("/api/productos?bajoStock=true")
            .to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        let nombres: Vec<&str> = body.iter().map(|p| p["nombre"].as_str().unwrap()).collect();
        assert_eq!(nombres, vec!["Acondicionador", "Laca"]);
    }
}
