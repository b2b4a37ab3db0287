use actix_web::web;
use lazy_static::lazy_static;
use std::sync::{Once, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// 路由配置函数类型
pub type RouteConfigFn = fn(&mut web::ServiceConfig);

/// 路由信息结构
#[derive(Debug, Clone)]
pub struct RouteInfo {
    pub name: String,
    pub description: String,
    pub module: String,
    pub config_fn: RouteConfigFn,
}

/// 全局路由注册器（按注册顺序挂载）
#[derive(Debug, Default)]
pub struct RouteRegistry {
    routes: Vec<RouteInfo>,
}

impl RouteRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册路由；同名路由被替换
    pub fn register_route(&mut self, route_info: RouteInfo) {
        match self.routes.iter_mut().find(|r| r.name == route_info.name) {
            Some(existing) => *existing = route_info,
            None => self.routes.push(route_info),
        }
    }

    pub fn get_routes(&self) -> &[RouteInfo] {
        &self.routes
    }

    /// 配置所有路由到 ServiceConfig
    pub fn configure_all_routes(&self, cfg: &mut web::ServiceConfig) {
        for route_info in &self.routes {
            (route_info.config_fn)(cfg);
        }
    }

    /// 获取路由统计信息
    pub fn get_stats(&self) -> (usize, Vec<String>) {
        let mut modules: Vec<String> = self.routes.iter().map(|r| r.module.clone()).collect();
        modules.sort();
        modules.dedup();
        (self.routes.len(), modules)
    }

    /// 输出路由信息
    pub fn log_routes_info(&self) {
        for route in self.get_routes() {
            tracing::info!("[routes] {} ({}): {}", route.name, route.module, route.description);
        }
        let (total, modules) = self.get_stats();
        tracing::info!("[routes] 共 {} 个路由，{} 个模块", total, modules.len());
    }
}

lazy_static! {
    static ref GLOBAL_ROUTE_REGISTRY: RwLock<RouteRegistry> = RwLock::new(RouteRegistry::new());
}

static INIT_ROUTES: Once = Once::new();

/// 获取全局路由注册器的读锁
pub fn get_global_route_registry() -> RwLockReadGuard<'static, RouteRegistry> {
    GLOBAL_ROUTE_REGISTRY
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 获取全局路由注册器的写锁
pub fn get_global_route_registry_mut() -> RwLockWriteGuard<'static, RouteRegistry> {
    GLOBAL_ROUTE_REGISTRY
        .write()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 注册路由到全局注册器
pub fn register_global_route(route_info: RouteInfo) {
    get_global_route_registry_mut().register_route(route_info);
}

/// 配置所有全局路由
pub fn configure_global_routes(cfg: &mut web::ServiceConfig) {
    get_global_route_registry().configure_all_routes(cfg);
}

/// 注册（仅首次）并挂载全部模块路由
pub fn configure_all(cfg: &mut web::ServiceConfig) {
    INIT_ROUTES.call_once(crate::init_routes);
    configure_global_routes(cfg);
}

/// 便捷宏：注册路由
#[macro_export]
macro_rules! register_route {
    ($name:expr, $description:expr, $module:expr, $config_fn:expr) => {
        $crate::route_registry::register_global_route($crate::route_registry::RouteInfo {
            name: $name.to_string(),
            description: $description.to_string(),
            module: $module.to_string(),
            config_fn: $config_fn,
        });
    };
}

/// 便捷宏：批量注册路由
#[macro_export]
macro_rules! register_routes {
    ($(($name:expr, $description:expr, $module:expr, $config_fn:expr)),* $(,)?) => {
        $(
            $crate::register_route!($name, $description, $module, $config_fn);
        )*
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: &mut web::ServiceConfig) {}

    fn info(name: &str, module: &str) -> RouteInfo {
        RouteInfo {
            name: name.to_string(),
            description: String::new(),
            module: module.to_string(),
            config_fn: noop,
        }
    }

    #[test]
    fn keeps_registration_order_and_replaces_duplicates() {
        let mut reg = RouteRegistry::new();
        reg.register_route(info("citas", "cita"));
        reg.register_route(info("pagos", "pago"));
        reg.register_route(info("citas", "cita"));
        let names: Vec<&str> = reg.get_routes().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["citas", "pagos"]);
        assert_eq!(reg.get_stats(), (2, vec!["cita".to_string(), "pago".to_string()]));
    }
}
