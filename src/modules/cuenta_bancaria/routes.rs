use actix_web::{delete, get, patch, post, web, HttpResponse, Result};

use super::models::{
    CreateCuentaBancaria, CuentaBancaria, CuentaBancariaDetalle, CuentaBancariaFilter,
    UpdateCuentaBancaria,
};
use super::service;
use crate::comm::response::{eliminado, Eliminado};
use crate::state::{Actor, AppState};

#[utoipa::path(
    get,
    path = "/api/cuentas-bancarias",
    tag = "CuentasBancarias",
    params(CuentaBancariaFilter),
    responses((status = 200, body = [CuentaBancaria]))
)]
#[get("")]
pub async fn listar(
    state: web::Data<AppState>,
    filter: web::Query<CuentaBancariaFilter>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service::listar(&state.pool, &filter).await?))
}

#[utoipa::path(
    post,
    path = "/api/cuentas-bancarias",
    tag = "CuentasBancarias",
    request_body = CreateCuentaBancaria,
    responses((status = 201, body = CuentaBancaria), (status = 400))
)]
#[post("")]
pub async fn crear(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<CreateCuentaBancaria>,
) -> Result<HttpResponse> {
    let cuenta = service::crear(&state.pool, actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(cuenta))
}

/// 账户详情（含 pagosCount）
#[utoipa::path(
    get,
    path = "/api/cuentas-bancarias/{id}",
    tag = "CuentasBancarias",
    params(("id" = i64, Path)),
    responses((status = 200, body = CuentaBancariaDetalle), (status = 404))
)]
#[get("/{id}")]
pub async fn obtener(state: web::Data<AppState>, id: web::Path<i64>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service::obtener(&state.pool, id.into_inner()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/cuentas-bancarias/{id}",
    tag = "CuentasBancarias",
    params(("id" = i64, Path)),
    request_body = UpdateCuentaBancaria,
    responses((status = 200, body = CuentaBancaria), (status = 404))
)]
#[patch("/{id}")]
pub async fn actualizar(
    state: web::Data<AppState>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<UpdateCuentaBancaria>,
) -> Result<HttpResponse> {
    let cuenta =
        service::actualizar(&state.pool, actor, id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(cuenta))
}

#[utoipa::path(
    delete,
    path = "/api/cuentas-bancarias/{id}",
    tag = "CuentasBancarias",
    params(("id" = i64, Path)),
    responses(
        (status = 200, body = Eliminado),
        (status = 404),
        (status = 409, description = "La cuenta tiene pagos asociados")
    )
)]
#[delete("/{id}")]
pub async fn eliminar(
    state: web::Data<AppState>,
    actor: Actor,
    id: web::Path<i64>,
) -> Result<HttpResponse> {
    service::eliminar(&state.pool, actor, id.into_inner()).await?;
    Ok(eliminado())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/cuentas-bancarias")
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
    async fn only_one_predeterminada_at_a_time() {
        let state = testing::state().await;
        let app = crate::test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/cuentas-bancarias")
            .set_json(json!({"banco": "Galicia", "titular": "Ana", "numeroCuenta": "001"}))
            .to_request();
        let primera: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(primera["predeterminada"], true);

        let req = test::TestRequest::post()
            .uri("/api/cuentas-bancarias")
            .set_json(json!({"banco": "Nación", "titular": "Ana", "numeroCuenta": "002"}))
            .to_request();
        let segunda: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(segunda["predeterminada"], false);

        let req = test::TestRequest::patch()
            .uri(&format!("/api/cuentas-bancarias/{}", segunda["id"]))
            .set_json(json!({"predeterminada": true}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["predeterminada"], true);

        let req = test::TestRequest::get()
            .uri("/api/cuentas-bancarias")
            .to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        let defaults: Vec<_> = body.iter().filter(|c| c["predeterminada"] == true).collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0]["id"], segunda["id"]);

        let req = test::TestRequest::get()
            .uri(&format!("/api/cuentas-bancarias/{}", primera["id"]))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["pagosCount"], 0);
        assert_eq!(body["banco"], "Galicia");

        let req = test::TestRequest::delete()
            .uri(&format!("/api/cuentas-bancarias/{}", primera["id"]))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!({"success": true}));
    }

    #[actix_web::test]
    async fn delete_with_pagos_keeps_the_account() {
        let state = testing::state().await;
        let app = crate::test_app!(state);
        let (cliente_id, servicio_id) = crate::modules::cita::routes::tests::fixtures(&state).await;

        let req = test::TestRequest::post()
            .uri("/api/cuentas-bancarias")
            .set_json(json!({"banco": "Santander", "titular": "Salón", "numeroCuenta": "777", "alias": "salon.pagos"}))
            .to_request();
        let cuenta: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/citas")
            .set_json(json!({"clienteId": cliente_id, "servicioId": servicio_id, "fecha": "2026-12-01", "hora": "11:00"}))
            .to_request();
        let cita: Value = test::call_and_read_body_json(&app, req).await;

        let req = test::TestRequest::post()
            .uri("/api/pagos")
            .set_json(json!({"citaId": cita["id"], "monto": 8000, "metodo": "transferencia", "cuentaBancariaId": cuenta["id"]}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/cuentas-bancarias/{}", cuenta["id"]))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 1010);

        let req = test::TestRequest::get()
            .uri(&format!("/api/cuentas-bancarias/{}", cuenta["id"]))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["pagosCount"], 1);
        assert_eq!(body["alias"], "salon.pagos");
        assert_eq!(body["activa"], true);
        assert_eq!(body["predeterminada"], true);
    }
}
