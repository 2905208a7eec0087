use crate::config::AppConfig;
use crate::errors::Result;
use crate::storage::Storage;
use std::sync::Arc;
use tracing::{debug, warn};
use tracing_appender::non_blocking::WorkerGuard;

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
}

/// 初始化日志
///
/// 开发环境输出带文件与行号的文本日志，其余环境输出 JSON。
/// 返回的 guard 需要在进程存活期间保留，否则缓冲中的日志会丢失。
pub fn init_tracing(config: &AppConfig) -> WorkerGuard {
    let stdout_log = std::io::stdout();
    let (non_blocking_writer, guard) = tracing_appender::non_blocking(stdout_log);
    let filter = tracing_subscriber::EnvFilter::new(&config.app.log_level);
    let tracing_format = tracing_subscriber::fmt::format()
        .with_level(true)
        .with_ansi(true);

    let tracing_builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking_writer)
        .event_format(tracing_format);

    if config.is_development() {
        tracing_builder
            .with_file(true)
            .with_line_number(true)
            .init();
    } else {
        tracing_builder.json().init();
    }

    guard
}

/// 准备存储：连接数据库并完成迁移
pub async fn prepare_storage() -> Result<StartupContext> {
    let config = AppConfig::get();
    debug!(
        "Connecting storage (pool_size: {}, timeout: {}s)",
        config.database.pool_size, config.database.timeout
    );

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    Ok(StartupContext { storage })
}
