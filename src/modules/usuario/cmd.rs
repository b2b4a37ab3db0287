use async_trait::async_trait;
use clap::{Arg, ArgMatches, Command};

use super::models::{CreateUsuario, Rol};
use super::service;
use crate::command_registry::{CommandModule, CommandResult};
use crate::state::Actor;

/// 用户模块命令：创建初始账户
pub struct UsuarioCommands;

#[async_trait]
impl CommandModule for UsuarioCommands {
    fn module_name(&self) -> &'static str {
        "usuario"
    }

    fn register_commands(&self) -> Vec<Command> {
        vec![Command::new("crear-usuario")
            .about("Crea un usuario (por defecto administrador)")
            .arg(
                Arg::new("nombre")
                    .long("nombre")
                    .value_name("NOMBRE")
                    .required(true),
            )
            .arg(
                Arg::new("email")
                    .long("email")
                    .value_name("EMAIL")
                    .required(true),
            )
            .arg(
                Arg::new("password")
                    .long("password")
                    .value_name("PASSWORD")
                    .required(true),
            )
            .arg(
                Arg::new("rol")
                    .long("rol")
                    .value_name("ROL")
                    .help("admin | empleado")
                    .default_value("admin"),
            )]
    }

    async fn handle_command(&self, command_name: &str, matches: &ArgMatches) -> CommandResult {
        match command_name {
            "crear-usuario" => {
                let arg = |name: &str| -> String {
                    matches.get_one::<String>(name).cloned().unwrap_or_default()
                };
                let rol: Rol = arg("rol").parse()?;
                let state = crate::app_bootstrap::open_state().await?;
                let usuario = service::crear(
                    &state.pool,
                    Actor(None),
                    CreateUsuario {
                        nombre: arg("nombre"),
                        email: arg("email"),
                        password: arg("password"),
                        rol,
                    },
                )
                .await?;
                println!(
                    "Usuario #{} creado: {} <{}> ({:?})",
                    usuario.id, usuario.nombre, usuario.email, usuario.rol
                );
                Ok(())
            }
            _ => Err(format!("Comando desconocido: {}", command_name).into()),
        }
    }
}
