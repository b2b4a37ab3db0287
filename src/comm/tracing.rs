use anyhow::Result;
use chrono::{Datelike, Timelike};
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

use crate::conf::LoggingConfig;

struct LogTimer;

impl fmt::time::FormatTime for LogTimer {
    fn format_time(&self, w: &mut fmt::format::Writer<'_>) -> std::fmt::Result {
        let now = chrono::Local::now();
        let cs = now.timestamp_subsec_millis() / 10;
        let s = format!(
            "{:04}-{:02}-{:02}:{:02}:{:02}:{:02}:{:02}",
            now.year(),
            now.month(),
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
            cs
        );
        w.write_str(&s)
    }
}

/// 构建日志过滤器 / Build the log filter
///
/// `RUST_LOG` 优先，否则使用配置中的 `logging.level`
fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(format!("{},sqlx=warn,actix_server=info", level)))
        .unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn"))
}

/// 初始化日志 / Initialize tracing
///
/// `logging.json = true` 时输出 bunyan JSON，否则输出紧凑文本格式。
/// 重复调用不会报错（测试中常见）。
pub fn init_tracing(logging: &LoggingConfig) -> Result<()> {
    LogTracer::init().ok();
    let filter = build_filter(&logging.level);

    if logging.json {
        let formatting_layer =
            BunyanFormattingLayer::new(env!("CARGO_PKG_NAME").into(), std::io::stdout);
        let subscriber = Registry::default()
            .with(filter)
            .with(JsonStorageLayer)
            .with(formatting_layer);
        tracing::subscriber::set_global_default(subscriber).ok();
    } else {
        fmt::SubscriberBuilder::default()
            .with_env_filter(filter)
            .with_timer(LogTimer)
            .compact()
            .with_target(false)
            .try_init()
            .ok();
    }
    Ok(())
}
