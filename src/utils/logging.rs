//! 日志工具模块
//!
//! 基于 tracing-subscriber 初始化全局日志

use tracing_subscriber::EnvFilter;

/// 初始化日志
///
/// 默认 info 级别，可通过 RUST_LOG 环境变量调整
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// 记录程序启动信息
pub fn log_startup(port: u16, max_concurrent: usize) {
    tracing::info!("{}", "=".repeat(60));
    tracing::info!("🚀 程序启动 - 自动测验求解模式");
    tracing::info!("🌐 监听端口: {}", port);
    tracing::info!("📊 最大并发任务数: {}", max_concurrent);
    tracing::info!("{}", "=".repeat(60));
}
