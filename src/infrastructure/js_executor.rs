//! JS 执行器 - 基础设施层
//!
//! 持有当前跳的 page 资源，只暴露"执行 JS / 读取页面"的能力

use anyhow::Result;
use chromiumoxide::Page;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;

/// JS 执行器
///
/// 职责：
/// - 持有当前跳唯一的 Page 资源
/// - 暴露 eval() 能力与只读页面访问
/// - 不认识 Snapshot / Strategy
/// - 不处理业务流程
pub struct JsExecutor {
    page: Page,
}

impl JsExecutor {
    /// 创建新的 JS 执行器
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// 获取 page 的引用（用于导航等操作）
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// 执行 JS 代码并返回 JSON 结果
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// 执行 JS 代码并反序列化为指定类型
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// 读取页面的可见文本（body.innerText）
    pub async fn visible_text(&self) -> Result<String> {
        self.eval_as("document.body ? document.body.innerText : ''")
            .await
    }

    /// 读取页面的完整 HTML
    pub async fn full_markup(&self) -> Result<String> {
        self.eval_as("document.documentElement.outerHTML").await
    }

    /// 关闭并释放 page 资源
    pub async fn close(self) -> Result<()> {
        self.page.close().await?;
        Ok(())
    }
}
