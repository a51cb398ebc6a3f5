//! Web 路由处理函数
//!
//! 实现检测端点与配置表单的路由处理逻辑

use super::AppState;
use crate::check::CheckResult;
use crate::config::{validate_config, CheckConfig, MatchMode};
use askama::Template;
use axum::{
    extract::{Form, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Response},
};
use std::str::FromStr;
use tracing::{error, warn};

/// 配置表单模板
#[derive(Template)]
#[template(path = "configure.html")]
struct ConfigureTemplate {
    command: String,
    match_type: String,
    match_value: String,
    port: u16,
    saved: bool,
}

impl ConfigureTemplate {
    /// 从当前配置填充表单
    fn from_config(config: &CheckConfig, saved: bool) -> Self {
        Self {
            command: config.command.clone(),
            match_type: config.match_type.as_str().to_string(),
            match_value: config.match_value.clone(),
            port: config.port,
            saved,
        }
    }
}

/// 配置表单提交字段
///
/// 全部以字符串接收，解析和校验在处理函数中完成，
/// 以便对非法的 `match_type` / `port` 返回指明字段的 422 响应。
#[derive(Debug, serde::Deserialize)]
pub struct ConfigureForm {
    pub command: String,
    pub match_type: String,
    pub match_value: String,
    pub port: String,
}

/// 执行一次检测，命令执行失败时转换为 HTTP 500 诊断响应
///
/// 匹配失败不会走到错误分支：判定结果承载在 `CheckResult` 中正常返回。
async fn run_probe(app_state: &AppState) -> Result<CheckResult, Response> {
    let config = app_state.manager.snapshot().await;
    match app_state.runner.run_check(&config).await {
        Ok(result) => Ok(result),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("命令执行失败: {}", e),
        )
            .into_response()),
    }
}

/// JSON 检测端点处理函数
pub async fn check_json(State(app_state): State<AppState>) -> impl IntoResponse {
    let result = match run_probe(&app_state).await {
        Ok(result) => result,
        Err(response) => return response,
    };

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::CONTENT_TYPE,
        "application/json".parse().unwrap(),
    );

    (headers, Json(result)).into_response()
}

/// XML 检测端点处理函数
pub async fn check_xml(State(app_state): State<AppState>) -> impl IntoResponse {
    let result = match run_probe(&app_state).await {
        Ok(result) => result,
        Err(response) => return response,
    };

    match result.to_xml() {
        Ok(body) => {
            let mut headers = HeaderMap::new();
            headers.insert(
                axum::http::header::CONTENT_TYPE,
                "application/xml".parse().unwrap(),
            );
            (headers, body).into_response()
        }
        Err(e) => {
            error!("XML 序列化失败: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "结果序列化失败").into_response()
        }
    }
}

/// 状态令牌检测端点处理函数
///
/// 响应体固定为 `success\n` 或 `failed\n`，便于脚本直接比对。
pub async fn check_status(State(app_state): State<AppState>) -> impl IntoResponse {
    let result = match run_probe(&app_state).await {
        Ok(result) => result,
        Err(response) => return response,
    };

    let mut headers = HeaderMap::new();
    headers.insert(axum::http::header::CONTENT_TYPE, "text/plain".parse().unwrap());

    (headers, result.to_status_line()).into_response()
}

/// 配置表单页面处理函数
pub async fn configure_form(State(app_state): State<AppState>) -> impl IntoResponse {
    let config = app_state.manager.snapshot().await;
    render_configure(ConfigureTemplate::from_config(&config, false))
}

/// 配置表单提交处理函数
///
/// 解析顺序：先在边界处拒绝非法字段（422），再更新内存快照，最后落盘。
/// 持久化失败返回 500，此时内存配置保持已更新状态，不做回滚。
pub async fn configure_submit(
    State(app_state): State<AppState>,
    Form(form): Form<ConfigureForm>,
) -> impl IntoResponse {
    let match_type = match MatchMode::from_str(form.match_type.trim()) {
        Ok(mode) => mode,
        Err(e) => {
            warn!("配置表单提交被拒绝: {}", e);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("match_type 字段无效: {}", e),
            )
                .into_response();
        }
    };

    let port: u16 = match form.port.trim().parse() {
        Ok(port) => port,
        Err(_) => {
            warn!("配置表单提交被拒绝: 无效的端口号: {}", form.port);
            return (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!("port 字段无效: {}", form.port),
            )
                .into_response();
        }
    };

    let current = app_state.manager.snapshot().await;
    let new_config = CheckConfig {
        command: form.command,
        match_type,
        match_value: form.match_value,
        port,
        ..(*current).clone()
    };

    if let Err(e) = validate_config(&new_config) {
        warn!("配置表单提交被拒绝: {}", e);
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            format!("配置无效: {}", e),
        )
            .into_response();
    }

    app_state.manager.replace(new_config.clone()).await;

    if let Err(e) = app_state.store.save(&new_config).await {
        error!("配置持久化失败: {}", e);
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("配置保存失败: {}", e),
        )
            .into_response();
    }

    render_configure(ConfigureTemplate::from_config(&new_config, true))
}

/// 渲染配置表单模板
fn render_configure(template: ConfigureTemplate) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            error!("模板渲染失败: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "模板渲染失败").into_response()
        }
    }
}
