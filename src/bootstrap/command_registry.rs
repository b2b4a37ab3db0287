use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command};
use std::sync::{Arc, Mutex, OnceLock};

/// 命令处理结果
pub type CommandResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// 命令注册器 trait，各模块实现此 trait 来注册命令
#[async_trait]
pub trait CommandModule: Send + Sync {
    /// 获取模块名称
    fn module_name(&self) -> &'static str;

    /// 注册模块的子命令
    fn register_commands(&self) -> Vec<Command>;

    /// 处理模块命令
    async fn handle_command(&self, command_name: &str, matches: &ArgMatches) -> CommandResult;
}

/// 命令注册器，使用单例模式
pub struct CommandRegistry {
    modules: Vec<Arc<dyn CommandModule>>,
}

impl CommandRegistry {
    fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// 获取全局单例实例
    pub fn instance() -> &'static Mutex<CommandRegistry> {
        static INSTANCE: OnceLock<Mutex<CommandRegistry>> = OnceLock::new();
        INSTANCE.get_or_init(|| Mutex::new(CommandRegistry::new()))
    }

    /// 注册模块（同名模块只保留一个）
    pub fn register_module(&mut self, module: Arc<dyn CommandModule>) {
        self.modules
            .retain(|m| m.module_name() != module.module_name());
        self.modules.push(module);
    }

    /// 构建完整的命令行应用
    pub fn build_app(&self) -> Command {
        let mut app = Command::new("salon-rust")
            .version(env!("CARGO_PKG_VERSION"))
            .about("Backend de gestión para salones de belleza")
            .subcommand_required(true)
            .arg_required_else_help(true);

        // 内置 server 命令；未指定的参数取配置文件中的值
        app = app.subcommand(
            Command::new("server")
                .about("Inicia el servidor HTTP")
                .arg(
                    Arg::new("host")
                        .long("host")
                        .value_name("HOST")
                        .help("Dirección de escucha (server.host)"),
                )
                .arg(
                    Arg::new("port")
                        .short('p')
                        .long("port")
                        .value_name("PORT")
                        .value_parser(clap::value_parser!(u16))
                        .help("Puerto (server.port)"),
                )
                .arg(
                    Arg::new("workers")
                        .short('w')
                        .long("workers")
                        .value_name("WORKERS")
                        .value_parser(clap::value_parser!(usize))
                        .help("Cantidad de workers (server.workers)"),
                ),
        );

        app = app.subcommand(Command::new("version").about("Muestra la versión"));

        app = app.subcommand(Command::new("migrate").about("Crea las tablas de la base de datos"));

        for module in &self.modules {
            for command in module.register_commands() {
                app = app.subcommand(command);
            }
        }

        app
    }

    /// 查找负责该命令的模块
    pub fn find_module(&self, command_name: &str) -> Option<Arc<dyn CommandModule>> {
        self.modules
            .iter()
            .find(|m| {
                m.register_commands()
                    .iter()
                    .any(|c| c.get_name() == command_name)
            })
            .cloned()
    }

    /// 获取所有注册的模块名称
    pub fn get_registered_modules(&self) -> Vec<&'static str> {
        self.modules.iter().map(|m| m.module_name()).collect()
    }
}

fn registry() -> std::sync::MutexGuard<'static, CommandRegistry> {
    CommandRegistry::instance()
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// 便捷函数：注册模块
pub fn register_module(module: Arc<dyn CommandModule>) {
    registry().register_module(module);
}

pub fn build_app() -> Command {
    registry().build_app()
}

/// 分发到模块处理（不在持锁状态下 await）
pub async fn handle_command(command_name: &str, matches: &ArgMatches) -> CommandResult {
    let (module, disponibles) = {
        let reg = registry();
        (reg.find_module(command_name), reg.get_registered_modules())
    };
    match module {
        Some(m) => m.handle_command(command_name, matches).await,
        None => Err(format!(
            "No hay ningún módulo para el comando '{}' (módulos: {})",
            command_name,
            disponibles.join(", ")
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Eco;

    #[async_trait]
    impl CommandModule for Eco {
        fn module_name(&self) -> &'static str {
            "eco"
        }

        fn register_commands(&self) -> Vec<Command> {
            vec![Command::new("eco").arg(Arg::new("texto").required(true))]
        }

        async fn handle_command(&self, _: &str, matches: &ArgMatches) -> CommandResult {
            match matches.get_one::<String>("texto").map(String::as_str) {
                Some("ok") => Ok(()),
                _ => Err("texto inesperado".into()),
            }
        }
    }

    #[tokio::test]
    async fn dispatches_to_registered_module() {
        let mut reg = CommandRegistry::new();
        reg.register_module(Arc::new(Eco));
        reg.register_module(Arc::new(Eco));
        assert_eq!(reg.get_registered_modules(), vec!["eco"]);

        let matches = reg
            .build_app()
            .try_get_matches_from(["salon-rust", "eco", "ok"])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        let module = reg.find_module(name).unwrap();
        assert!(module.handle_command(name, sub).await.is_ok());
        assert!(reg.find_module("desconocido").is_none());
    }
}
