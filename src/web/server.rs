//! Web服务器实现
//!
//! 提供HTTP服务器启动、路由注册和优雅关闭

use super::{handlers, AppState};
use crate::error::{CommandVitalsError, Result, WebError};
use axum::{
    response::Redirect,
    routing::get,
    Router,
};
use log::info;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// 创建应用路由
///
/// 检测端点同时接受GET和POST，行为相同；
/// 根路径重定向到配置页面。
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { Redirect::temporary("/configure") }))
        .route(
            "/check/json",
            get(handlers::check_json).post(handlers::check_json),
        )
        .route(
            "/check/xml",
            get(handlers::check_xml).post(handlers::check_xml),
        )
        .route(
            "/check/status",
            get(handlers::check_status).post(handlers::check_status),
        )
        .route(
            "/configure",
            get(handlers::configure_form).post(handlers::configure_submit),
        )
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// Web服务器
pub struct WebServer {
    /// 监听地址
    bind_address: String,
    /// 监听端口
    port: u16,
    /// 共享应用状态
    state: AppState,
    /// 关闭信号接收器
    shutdown_rx: Option<broadcast::Receiver<()>>,
}

impl WebServer {
    /// 创建新的Web服务器
    ///
    /// 监听地址和端口在构造时固定，配置热更新不会重新绑定监听器。
    pub fn new(
        bind_address: String,
        port: u16,
        state: AppState,
        shutdown_rx: broadcast::Receiver<()>,
    ) -> Self {
        Self {
            bind_address,
            port,
            state,
            shutdown_rx: Some(shutdown_rx),
        }
    }

    /// 启动Web服务器并阻塞到收到关闭信号
    pub async fn start(&mut self) -> Result<()> {
        let addr = format!("{}:{}", self.bind_address, self.port);
        info!("启动Web服务器，监听地址: {}", addr);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| WebError::BindError {
                addr: addr.clone(),
                source: e,
            })?;

        let mut shutdown_rx = self.shutdown_rx.take().ok_or_else(|| {
            CommandVitalsError::Other(anyhow::anyhow!("关闭信号接收器已被使用"))
        })?;

        let router = create_router(self.state.clone());

        info!("Web服务器已启动: http://{}", addr);
        info!("检测端点: http://{}/check/status", addr);
        info!("配置页面: http://{}/configure", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("接收到关闭信号，正在关闭Web服务器...");
            })
            .await?;

        info!("Web服务器已关闭");
        Ok(())
    }
}
