use anyhow::Result;
use auto_quiz_solver::api;
use auto_quiz_solver::config::Config;
use auto_quiz_solver::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::from_env();
    logging::log_startup(config.port, config.max_concurrent_jobs);

    // 启动 HTTP 接收端并阻塞运行
    api::serve(config).await?;

    Ok(())
}
