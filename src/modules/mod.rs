/// 模块管理
/// 包含所有业务模块的定义与注册
pub mod audit_log;
pub mod cita;
pub mod cliente;
pub mod configuracion;
pub mod cuenta_bancaria;
pub mod pago;
pub mod producto;
pub mod servicio;
pub mod usuario;

use std::sync::Arc;

/// 注册所有业务模块的路由
pub fn register_module_routes() {
    crate::register_routes![
        ("clientes", "Clientes", "cliente", cliente::routes::configure),
        ("servicios", "Servicios", "servicio", servicio::routes::configure),
        ("productos", "Productos y stock", "producto", producto::routes::configure),
        ("citas", "Citas y disponibilidad", "cita", cita::routes::configure),
        ("pagos", "Pagos", "pago", pago::routes::configure),
        (
            "cuentas-bancarias",
            "Cuentas bancarias",
            "cuenta_bancaria",
            cuenta_bancaria::routes::configure
        ),
        ("usuarios", "Usuarios", "usuario", usuario::routes::configure),
        ("audit-logs", "Auditoría", "audit_log", audit_log::routes::configure),
        (
            "configuracion",
            "Configuración del negocio",
            "configuracion",
            configuracion::routes::configure
        ),
    ];
}

/// 注册所有业务模块的命令
pub fn register_module_commands() {
    crate::command_registry::register_module(Arc::new(usuario::cmd::UsuarioCommands));
    crate::command_registry::register_module(Arc::new(cita::cmd::CitaCommands));
}
