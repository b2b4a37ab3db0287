use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use clap::{Arg, ArgMatches, Command};

use super::service;
use crate::command_registry::{CommandModule, CommandResult};

/// 预约模块命令：打印某天的日程
pub struct CitaCommands;

#[async_trait]
impl CommandModule for CitaCommands {
    fn module_name(&self) -> &'static str {
        "cita"
    }

    fn register_commands(&self) -> Vec<Command> {
        vec![Command::new("agenda")
            .about("Muestra las citas de un día y los horarios libres")
            .arg(
                Arg::new("fecha")
                    .short('f')
                    .long("fecha")
                    .value_name("YYYY-MM-DD")
                    .help("Día a consultar (por defecto hoy)"),
            )]
    }

    async fn handle_command(&self, command_name: &str, matches: &ArgMatches) -> CommandResult {
        match command_name {
            "agenda" => {
                let fecha = match matches.get_one::<String>("fecha") {
                    Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                        .map_err(|e| format!("fecha inválida '{}': {}", raw, e))?,
                    None => Local::now().date_naive(),
                };
                let state = crate::app_bootstrap::open_state().await?;
                let (citas, libres) = service::agenda_del_dia(&state.pool, &state.config, fecha).await?;

                println!("Agenda del {}", fecha);
                println!("================");
                if citas.is_empty() {
                    println!("Sin citas");
                }
                for c in &citas {
                    println!(
                        "  {}  #{:<4} {:<24} {:<20} {:?}",
                        crate::comm::time::format_hora(c.cita.hora),
                        c.cita.id,
                        c.cliente_nombre,
                        c.servicio_nombre.as_deref().unwrap_or("-"),
                        c.cita.estado
                    );
                }
                println!("Horarios libres: {}", libres.join(" "));
                Ok(())
            }
            _ => Err(format!("Comando desconocido: {}", command_name).into()),
        }
    }
}
