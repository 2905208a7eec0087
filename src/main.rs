use std::process::ExitCode;

use dotenv::dotenv;
use human_panic::setup_panic;
use tracing::{debug, error, info, warn};

// 从 lib.rs 导入模块
use rust_school_records::config::AppConfig;
use rust_school_records::runtime::lifetime;

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    // 记录程序启动时间
    let start_datetime = chrono::Utc::now();

    // 初始化配置
    setup_panic!();
    if let Err(e) = AppConfig::init() {
        eprintln!("Failed to initialize configuration: {e}");
        return ExitCode::FAILURE;
    }
    let config = AppConfig::get();

    // 初始化日志
    let _guard = lifetime::startup::init_tracing(config);

    warn!(
        "Starting school records store...
        Project: {}
        Version: {}
        Authors: {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        env!("CARGO_PKG_AUTHORS")
    );

    let startup = match lifetime::startup::prepare_storage().await {
        Ok(startup) => startup,
        Err(e) => {
            error!("{}", e.format_simple());
            #[cfg(debug_assertions)]
            eprintln!("{}", e.format_colored());
            return ExitCode::FAILURE;
        }
    };

    debug!(
        "Storage provisioned in {} ms",
        chrono::Utc::now()
            .signed_duration_since(start_datetime)
            .num_milliseconds()
    );

    match startup.storage.list_schools().await {
        Ok(schools) => {
            info!(
                "School records store ready ({} environment, {} school(s))",
                config.app.environment,
                schools.len()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Failed to read schools: {}", e);
            ExitCode::FAILURE
        }
    }
}
