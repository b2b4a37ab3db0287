use clap::ArgMatches;
use std::error::Error;

use salon_rust::app_bootstrap::{self, AppBootstrap};
use salon_rust::command_registry::{build_app, handle_command};
use salon_rust::init_commands;

#[actix_web::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // 初始化所有模块的命令
    init_commands();

    // 构建命令行应用
    let matches: ArgMatches = build_app().get_matches();

    match matches.subcommand() {
        Some(("server", sub_matches)) => {
            handle_server_command(sub_matches).await?;
        }
        Some(("version", _)) => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
        Some(("migrate", _)) => {
            app_bootstrap::migrate().await?;
            println!("Migraciones aplicadas");
        }
        Some((command_name, sub_matches)) => {
            // 尝试使用模块处理命令
            if let Err(e) = handle_command(command_name, sub_matches).await {
                eprintln!("Error en el comando '{}': {}", command_name, e);
                std::process::exit(1);
            }
        }
        None => {
            eprintln!("Comando desconocido, use --help para ver los comandos disponibles");
            std::process::exit(1);
        }
    }

    Ok(())
}

async fn handle_server_command(matches: &ArgMatches) -> Result<(), Box<dyn Error>> {
    let mut bootstrap = AppBootstrap::new();
    if let Some(host) = matches.get_one::<String>("host") {
        bootstrap = bootstrap.with_host(host.clone());
    }
    if let Some(port) = matches.get_one::<u16>("port") {
        bootstrap = bootstrap.with_port(*port);
    }
    if let Some(workers) = matches.get_one::<usize>("workers") {
        bootstrap = bootstrap.with_workers(*workers);
    }

    bootstrap.run().await?;
    Ok(())
}
