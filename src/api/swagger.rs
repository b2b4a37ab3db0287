use utoipa::OpenApi;

use crate::modules::{
    audit_log, cita, cliente, configuracion, cuenta_bancaria, pago, producto, servicio, usuario,
};

/// OpenAPI 文档聚合
#[derive(OpenApi)]
#[openapi(
    info(title = "Salón API", description = "Gestión de clientes, citas, servicios, stock y pagos"),
    paths(
        crate::api::health::health,
        configuracion::routes::obtener,
        configuracion::routes::actualizar,
        cliente::routes::listar,
        cliente::routes::crear,
        cliente::routes::obtener,
        cliente::routes::actualizar,
        cliente::routes::eliminar,
        cliente::routes::citas,
        servicio::routes::listar,
        servicio::routes::crear,
        servicio::routes::obtener,
        servicio::routes::actualizar,
        servicio::routes::eliminar,
        producto::routes::listar,
        producto::routes::crear,
        producto::routes::obtener,
        producto::routes::actualizar,
        producto::routes::eliminar,
        producto::routes::ajustar_stock,
        cita::routes::listar,
        cita::routes::crear,
        cita::routes::disponibilidad,
        cita::routes::obtener,
        cita::routes::actualizar,
        cita::routes::eliminar,
        pago::routes::listar,
        pago::routes::crear,
        pago::routes::resumen,
        pago::routes::obtener,
        pago::routes::actualizar,
        pago::routes::eliminar,
        cuenta_bancaria::routes::listar,
        cuenta_bancaria::routes::crear,
        cuenta_bancaria::routes::obtener,
        cuenta_bancaria::routes::actualizar,
        cuenta_bancaria::routes::eliminar,
        usuario::routes::listar,
        usuario::routes::crear,
        usuario::routes::obtener,
        usuario::routes::actualizar,
        usuario::routes::eliminar,
        audit_log::routes::listar,
    ),
    components(
        schemas(
            crate::HealthStatus,
            crate::api::health::HealthResponse,
            crate::comm::response::Eliminado,
            configuracion::models::Configuracion,
            configuracion::models::UpdateConfiguracion,
            cliente::models::Cliente,
            cliente::models::CreateCliente,
            cliente::models::UpdateCliente,
            servicio::models::Servicio,
            servicio::models::CreateServicio,
            servicio::models::UpdateServicio,
            producto::models::Producto,
            producto::models::CreateProducto,
            producto::models::UpdateProducto,
            producto::models::AjusteStock,
            cita::models::EstadoCita,
            cita::models::Cita,
            cita::models::CitaDetalle,
            cita::models::CreateCita,
            cita::models::UpdateCita,
            cita::models::Conflicto,
            cita::models::Disponibilidad,
            pago::models::MetodoPago,
            pago::models::Pago,
            pago::models::CreatePago,
            pago::models::UpdatePago,
            pago::models::ResumenMetodo,
            pago::models::ResumenPagos,
            cuenta_bancaria::models::CuentaBancaria,
            cuenta_bancaria::models::CuentaBancariaDetalle,
            cuenta_bancaria::models::CreateCuentaBancaria,
            cuenta_bancaria::models::UpdateCuentaBancaria,
            usuario::models::Rol,
            usuario::models::Usuario,
            usuario::models::CreateUsuario,
            usuario::models::UpdateUsuario,
            audit_log::models::Accion,
            audit_log::models::AuditLog,
        )
    ),
    tags(
        (name = "Health", description = "Estado del servicio"),
        (name = "Configuracion", description = "Datos del negocio y horario de atención"),
        (name = "Clientes", description = "Alta, baja y modificación de clientes"),
        (name = "Servicios", description = "Catálogo de servicios"),
        (name = "Productos", description = "Productos y stock"),
        (name = "Citas", description = "Agenda y disponibilidad"),
        (name = "Pagos", description = "Cobros y resumen por método"),
        (name = "CuentasBancarias", description = "Cuentas para transferencias"),
        (name = "Usuarios", description = "Usuarios del sistema"),
        (name = "AuditLog", description = "Registro de auditoría")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_scope() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();
        for expected in [
            "/api/health",
            "/api/configuracion",
            "/api/clientes/{id}/citas",
            "/api/productos/{id}/stock",
            "/api/citas/disponibilidad",
            "/api/pagos/resumen",
            "/api/cuentas-bancarias",
            "/api/usuarios/{id}",
            "/api/audit-logs",
        ] {
            assert!(
                paths.iter().any(|p| p.as_str() == expected),
                "missing path {}",
                expected
            );
        }
    }
}
