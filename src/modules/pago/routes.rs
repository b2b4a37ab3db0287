use actix_web::{delete, get, patch, post, web, HttpResponse, Result};

use super::models::{CreatePago, Pago, PagoFilter, ResumenPagos, ResumenQuery, UpdatePago};
use super::service;
use crate::comm::response::{eliminado, Eliminado};
use crate::state::{Actor, AppState};

#[utoipa::path(
    get,
    path = "/api/pagos",
    tag = "Pagos",
    params(PagoFilter),
    responses((status = 200, body = [Pago]))
)]
#[get("")]
pub async fn listar(
    state: web::Data<AppState>,
    filter: web::Query<PagoFilter>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service::listar(&state.pool, &filter).await?))
}

/// 登记付款
#[utoipa::path(
    post,
    path = "/api/pagos",
    tag = "Pagos",
    request_body = CreatePago,
    responses(
        (status = 201, body = Pago),
        (status = 400, description = "Monto o cuenta inválidos"),
        (status = 404, description = "Cita inexistente")
    )
)]
#[post("")]
pub async fn crear(
    state: web::Data<AppState>,
    actor: Actor,
    body: web::Json<CreatePago>,
) -> Result<HttpResponse> {
    let pago = service::crear(&state.pool, actor, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(pago))
}

/// 按付款方式汇总
#[utoipa::path(
    get,
    path = "/api/pagos/resumen",
    tag = "Pagos",
    params(ResumenQuery),
    responses((status = 200, body = ResumenPagos))
)]
#[get("/resumen")]
pub async fn resumen(
    state: web::Data<AppState>,
    query: web::Query<ResumenQuery>,
) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service::resumen(&state.pool, &query).await?))
}

#[utoipa::path(
    get,
    path = "/api/pagos/{id}",
    tag = "Pagos",
    params(("id" = i64, Path)),
    responses((status = 200, body = Pago), (status = 404))
)]
#[get("/{id}")]
pub async fn obtener(state: web::Data<AppState>, id: web::Path<i64>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(service::obtener(&state.pool, id.into_inner()).await?))
}

#[utoipa::path(
    patch,
    path = "/api/pagos/{id}",
    tag = "Pagos",
    params(("id" = i64, Path)),
    request_body = UpdatePago,
    responses((status = 200, body = Pago), (status = 400), (status = 404))
)]
#[patch("/{id}")]
pub async fn actualizar(
    state: web::Data<AppState>,
    actor: Actor,
    id: web::Path<i64>,
    body: web::Json<UpdatePago>,
) -> Result<HttpResponse> {
    let pago = service::actualizar(&state.pool, actor, id.into_inner(), body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(pago))
}

#[utoipa::path(
    delete,
    path = "/api/pagos/{id}",
    tag = "Pagos",
    params(("id" = i64, Path)),
    responses((status = 200, body = Eliminado), (status = 404))
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
        web::scope("/api/pagos")
            .service(listar)
            .service(crear)
            .service(resumen)
            .service(obtener)
            .service(actualizar)
            .service(eliminar),
    );
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test};
    use serde_json::{json, Value};

    use crate::modules::cita::routes::tests::fixtures;
    use crate::state::testing;

    #[actix_web::test]
    async fn transfer_rules_and_cita_completion() {
        let state = testing::state().await;
        let app = crate::test_app!(state);
        let (cliente_id, servicio_id) = fixtures(&state).await;

        let req = test::TestRequest::post()
            .uri("/api/citas")
            .set_json(json!({"clienteId": cliente_id, "servicioId": servicio_id, "fecha": "2026-11-10", "hora": "10:00"}))
            .to_request();
        let cita: Value = test::call_and_read_body_json(&app, req).await;
        let cita_id = cita["id"].as_i64().unwrap();

        // 没有默认账户时转账被拒绝
        let req = test::TestRequest::post()
            .uri("/api/pagos")
            .set_json(json!({"citaId": cita_id, "monto": 8000, "metodo": "transferencia"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/cuentas-bancarias")
            .set_json(json!({"banco": "Galicia", "titular": "Salón", "numeroCuenta": "123"}))
            .to_request();
        let cuenta: Value = test::call_and_read_body_json(&app, req).await;

        // 现金不能带账户
        let req = test::TestRequest::post()
            .uri("/api/pagos")
            .set_json(json!({"citaId": cita_id, "monto": 100, "metodo": "efectivo", "cuentaBancariaId": cuenta["id"]}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/pagos")
            .set_json(json!({"citaId": cita_id, "monto": 8000, "metodo": "transferencia", "fecha": "2026-11-10"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let pago: Value = test::read_body_json(resp).await;
        assert_eq!(pago["cuentaBancariaId"], cuenta["id"]);

        let req = test::TestRequest::get()
            .uri(&format!("/api/citas/{}", cita_id))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["estado"], "completada");

        let req = test::TestRequest::get()
            .uri(&format!("/api/cuentas-bancarias/{}", cuenta["id"]))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["pagosCount"], 1);

        // 有付款时账户与预约都不能删除
        let req = test::TestRequest::delete()
            .uri(&format!("/api/cuentas-bancarias/{}", cuenta["id"]))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
        let req = test::TestRequest::get()
            .uri(&format!("/api/cuentas-bancarias/{}", cuenta["id"]))
            .to_request();
        let intacta: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(intacta["banco"], "Galicia");
        assert_eq!(intacta["numeroCuenta"], "123");
        assert_eq!(intacta["predeterminada"], true);
        assert_eq!(intacta["pagosCount"], 1);

        let req = test::TestRequest::get()
            .uri(&format!("/api/citas/{}", cita_id))
            .to_request();
        let cita_antes: Value = test::call_and_read_body_json(&app, req).await;
        let req = test::TestRequest::delete()
            .uri(&format!("/api/citas/{}", cita_id))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);
        let req = test::TestRequest::get()
            .uri(&format!("/api/citas/{}", cita_id))
            .to_request();
        let cita_despues: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(cita_despues, cita_antes);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/pagos/{}", pago["id"]))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["success"], true);
        let req = test::TestRequest::delete()
            .uri(&format!("/api/cuentas-bancarias/{}", cuenta["id"]))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
    }

    #[actix_web::test]
    async fn rejects_missing_cita_and_bad_amount() {
        let state = testing::state().await;
        let app = crate::test_app!(state);

        let req = test::TestRequest::post()
            .uri("/api/pagos")
            .set_json(json!({"citaId": 42, "monto": 100, "metodo": "efectivo"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

        let req = test::TestRequest::post()
            .uri("/api/pagos")
            .set_json(json!({"citaId": 42, "monto": -5, "metodo": "efectivo"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);

        let req = test::TestRequest::post()
            .uri("/api/pagos")
            .set_json(json!({"citaId": 42, "monto": 10, "metodo": "cheque"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn resumen_groups_by_method_and_range() {
        let state = testing::state().await;
        let app = crate::test_app!(state);
        let (cliente_id, _) = fixtures(&state).await;

        let mut citas = Vec::new();
        for hora in ["09:00", "10:00", "11:00"] {
            let req = test::TestRequest::post()
                .uri("/api/citas")
                .set_json(json!({"clienteId": cliente_id, "fecha": "2026-11-12", "hora": hora}))
                .to_request();
            let cita: Value = test::call_and_read_body_json(&app, req).await;
            citas.push(cita["id"].as_i64().unwrap());
        }
        for (cita_id, monto, metodo, fecha) in [
            (citas[0], 1000.0, "efectivo", "2026-11-12"),
            (citas[1], 2500.0, "efectivo", "2026-11-12"),
            (citas[2], 4000.0, "tarjeta", "2026-11-13"),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/pagos")
                .set_json(json!({"citaId": cita_id, "monto": monto, "metodo": metodo, "fecha": fecha}))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get().uri("/api/pagos/resumen").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 7500.0);
        assert_eq!(body["cantidad"], 3);
        assert_eq!(body["porMetodo"][0]["metodo"], "efectivo");
        assert_eq!(body["porMetodo"][0]["total"], 3500.0);
        assert_eq!(body["porMetodo"][0]["cantidad"], 2);

        let req = test::TestRequest::get()
            .uri("/api/pagos/resumen?desde=2026-11-13&hasta=2026-11-13")
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["total"], 4000.0);
        assert_eq!(body["porMetodo"].as_array().unwrap().len(), 1);

        let req = test::TestRequest::get()
            .uri("/api/pagos?metodo=efectivo")
            .to_request();
        let body: Vec<Value> = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.len(), 2);
    }
}
