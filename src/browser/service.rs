//! 浏览器服务
//!
//! 全局唯一的 Chrome 实例，惰性启动且并发安全；
//! 每一跳向它申请一个新的 page，用完必须归还（关闭）

use std::path::Path;

use anyhow::Result;
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::sync::OnceCell;
use tokio::time::{sleep, Duration};
use tracing::{debug, error, info};

use crate::config::Config;

/// 浏览器服务
///
/// 职责：
/// - 惰性启动唯一的无头浏览器（OnceCell 防止并发重复初始化）
/// - 为每一跳创建独立的 page
/// - 不认识 Snapshot / Strategy / 流程
pub struct BrowserService {
    headless: bool,
    chrome_executable: Option<String>,
    browser: OnceCell<Browser>,
}

impl BrowserService {
    pub fn new(config: &Config) -> Self {
        Self {
            headless: config.headless,
            chrome_executable: config.chrome_executable.clone(),
            browser: OnceCell::new(),
        }
    }

    /// 获取浏览器实例，首次调用时启动
    async fn browser(&self) -> Result<&Browser> {
        self.browser.get_or_try_init(|| self.launch()).await
    }

    /// 启动浏览器
    async fn launch(&self) -> Result<Browser> {
        info!("🚀 启动无头浏览器...");

        let mut builder = BrowserConfig::builder().args(vec![
            "--disable-gpu",
            "--no-sandbox",            // 禁用沙盒，防止权限问题导致的崩溃
            "--disable-dev-shm-usage", // 防止共享内存不足
        ]);

        if self.headless {
            builder = builder.new_headless_mode();
        } else {
            builder = builder.with_head();
        }

        if let Some(path) = &self.chrome_executable {
            builder = builder.chrome_executable(Path::new(path));
        }

        let config = builder.build().map_err(|e| {
            error!("配置无头浏览器失败: {}", e);
            anyhow::anyhow!("配置无头浏览器失败: {}", e)
        })?;

        let (browser, mut handler) = Browser::launch(config).await.map_err(|e| {
            error!("启动无头浏览器失败: {}", e);
            anyhow::anyhow!("启动无头浏览器失败: {}", e)
        })?;
        debug!("无头浏览器启动成功");

        // 在后台处理浏览器事件
        tokio::spawn(async move {
            while let Some(h) = handler.next().await {
                if h.is_err() {
                    break;
                }
            }
        });

        Ok(browser)
    }

    /// 为一次跳创建新的 page
    ///
    /// 调用方负责在该跳结束时关闭 page（无论成败）
    pub async fn new_page(&self) -> Result<Page> {
        let browser = self.browser().await?;
        let page = browser.new_page("about:blank").await.map_err(|e| {
            error!("创建页面失败: {}", e);
            anyhow::anyhow!("创建页面失败: {}", e)
        })?;
        Ok(page)
    }
}

/// 导航到指定 URL 并等待页面安定
pub async fn navigate_and_settle(page: &Page, url: &str) -> Result<()> {
    debug!("导航到: {}", url);
    page.goto(url).await.map_err(|e| {
        error!("导航到 {} 失败: {}", url, e);
        anyhow::anyhow!("导航到 {} 失败: {}", url, e)
    })?;
    page.wait_for_navigation().await.map_err(|e| {
        error!("等待页面加载失败: {}", e);
        anyhow::anyhow!("等待页面加载失败: {}", e)
    })?;

    // 添加短暂延迟以等待网络请求安定
    sleep(Duration::from_millis(300)).await;
    Ok(())
}
