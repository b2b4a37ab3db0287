//! 应用配置 / Typed application configuration
//!
//! Loaded from the [`ConfigManager`] sources and validated once at startup.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::comm::config::{ConfigError, ConfigManager};
use crate::comm::time::parse_hora;
use crate::error::AppResult;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// 连接池最大连接数
    pub pool: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

/// 预约默认值，用于初始化 `configuracion` 表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgendaConfig {
    /// 预约间隔（分钟）
    pub intervalo: u32,
    pub apertura: NaiveTime,
    pub cierre: NaiveTime,
    pub permitir_superposicion: bool,
    /// 最多返回的建议时间数
    pub sugerencias: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NegocioConfig {
    pub nombre: String,
    pub moneda: String,
}

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfiguration {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub agenda: AgendaConfig,
    pub negocio: NegocioConfig,
}

impl Default for AppConfiguration {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 3000,
                workers: Some(4),
            },
            database: DatabaseConfig {
                url: "sqlite://salon.db?mode=rwc".to_string(),
                pool: 5,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
            agenda: AgendaConfig {
                intervalo: 30,
                apertura: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
                cierre: NaiveTime::from_hms_opt(20, 0, 0).unwrap_or_default(),
                permitir_superposicion: false,
                sugerencias: 5,
            },
            negocio: NegocioConfig {
                nombre: "Mi Salón".to_string(),
                moneda: "ARS".to_string(),
            },
        }
    }
}

impl AppConfiguration {
    /// 从配置管理器加载配置，缺省项使用默认值
    pub fn load(mgr: &ConfigManager) -> AppResult<Self> {
        let mut cfg = Self::default();

        if let Ok(host) = mgr.get_string("server.host") {
            cfg.server.host = host;
        }
        if let Ok(port) = mgr.get::<u16>("server.port") {
            cfg.server.port = port;
        }
        if let Ok(workers) = mgr.get::<usize>("server.workers") {
            cfg.server.workers = (workers > 0).then_some(workers);
        }

        if let Ok(url) = mgr.get_string("database.url") {
            cfg.database.url = url;
        }
        if let Ok(pool) = mgr.get::<u32>("database.pool") {
            cfg.database.pool = pool;
        }

        if let Ok(level) = mgr.get_string("logging.level") {
            cfg.logging.level = level.to_lowercase();
        }
        if let Ok(json) = mgr.get::<bool>("logging.json") {
            cfg.logging.json = json;
        }

        if let Ok(intervalo) = mgr.get::<u32>("agenda.intervalo") {
            cfg.agenda.intervalo = intervalo;
        }
        if let Ok(raw) = mgr.get_string("agenda.apertura") {
            cfg.agenda.apertura = hora_config("agenda.apertura", &raw)?;
        }
        if let Ok(raw) = mgr.get_string("agenda.cierre") {
            cfg.agenda.cierre = hora_config("agenda.cierre", &raw)?;
        }
        if let Ok(permitir) = mgr.get::<bool>("agenda.superposicion") {
            cfg.agenda.permitir_superposicion = permitir;
        }
        if let Ok(sugerencias) = mgr.get::<usize>("agenda.sugerencias") {
            cfg.agenda.sugerencias = sugerencias;
        }

        if let Ok(nombre) = mgr.get_string("negocio.nombre") {
            cfg.negocio.nombre = nombre;
        }
        if let Ok(moneda) = mgr.get_string("negocio.moneda") {
            cfg.negocio.moneda = moneda;
        }

        cfg.validate()?;
        tracing::debug!("应用配置: {:?}", cfg);
        Ok(cfg)
    }

    /// 验证配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port < 1024 {
            return Err(invalid("server.port", "debe estar entre 1024 y 65535"));
        }
        if self.database.url.trim().is_empty() {
            return Err(invalid("database.url", "no puede estar vacío"));
        }
        if self.database.pool == 0 {
            return Err(invalid("database.pool", "debe ser mayor que 0"));
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(invalid(
                "logging.level",
                format!("debe ser uno de {:?}", LOG_LEVELS),
            ));
        }
        if !(5..=240).contains(&self.agenda.intervalo) {
            return Err(invalid("agenda.intervalo", "debe estar entre 5 y 240 minutos"));
        }
        if self.agenda.apertura >= self.agenda.cierre {
            return Err(invalid(
                "agenda.apertura",
                "la apertura debe ser anterior al cierre",
            ));
        }
        Ok(())
    }
}

fn hora_config(key: &str, raw: &str) -> Result<NaiveTime, ConfigError> {
    parse_hora(raw).ok_or_else(|| invalid(key, format!("hora inválida '{}'", raw)))
}

fn invalid(key: &str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        key: key.to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::config::ConfigSource;
    use config::FileFormat;

    fn from_toml(content: &str) -> AppResult<AppConfiguration> {
        let mgr = ConfigManager::isolated(vec![ConfigSource::String {
            content: content.to_string(),
            format: FileFormat::Toml,
        }])
        .unwrap();
        AppConfiguration::load(&mgr)
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(AppConfiguration::default().validate().is_ok());
    }

    #[test]
    fn test_load_overrides() {
        let cfg = from_toml(
            "[server]\nport = 8081\n[agenda]\nintervalo = 15\napertura = \"08:30\"\ncierre = \"18:00\"\n[logging]\nlevel = \"DEBUG\"",
        )
        .unwrap();
        assert_eq!(cfg.server.port, 8081);
        assert_eq!(cfg.agenda.intervalo, 15);
        assert_eq!(cfg.agenda.apertura, NaiveTime::from_hms_opt(8, 30, 0).unwrap());
        assert_eq!(cfg.logging.level, "debug");
    }

    #[test]
    fn test_rejects_bad_agenda() {
        assert!(from_toml("[agenda]\nintervalo = 2").is_err());
        assert!(from_toml("[agenda]\napertura = \"21:00\"").is_err());
        assert!(from_toml("[agenda]\ncierre = \"tarde\"").is_err());
    }

    #[test]
    fn test_rejects_unknown_log_level() {
        assert!(from_toml("[logging]\nlevel = \"verbose\"").is_err());
    }
}
