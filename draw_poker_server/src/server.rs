use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::ServerError;
use crate::session;
use crate::table::Table;

pub async fn bind(port: u16) -> Result<TcpListener, ServerError> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| ServerError::Bind { port, source })?;
    info!("服务器正在监听 {}", listener.local_addr()?);
    Ok(listener)
}

/// 依次接受 `connections` 个连接，每个连接交给独立的任务处理。
///
/// 某个位置 accept 失败时只记录日志并跳过，序号就是位置编号。
pub async fn accept_clients(
    listener: TcpListener,
    connections: usize,
    table: Arc<Table>,
) -> Vec<JoinHandle<()>> {
    let mut handles = Vec::with_capacity(connections);
    for ordinal in 0..connections {
        info!("等待第 {} 个连接...", ordinal + 1);
        match listener.accept().await {
            Ok((stream, peer)) => {
                info!("第 {} 个连接已建立: {}", ordinal + 1, peer);
                handles.push(tokio::spawn(session::serve(
                    stream,
                    ordinal,
                    peer.to_string(),
                    table.clone(),
                )));
            }
            Err(e) => error!("第 {} 个连接建立失败: {}", ordinal + 1, e),
        }
    }
    info!("已完成 {} 个连接位置的等待", connections);
    handles
}

/// 等待所有会话任务结束，异常退出（panic）的任务记录为错误，返回其数量
pub async fn join_sessions(handles: Vec<JoinHandle<()>>) -> usize {
    let mut failed = 0;
    for handle in handles {
        if let Err(e) = handle.await {
            error!("会话任务异常结束: {}", e);
            failed += 1;
        }
    }
    failed
}
