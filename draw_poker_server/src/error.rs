use draw_poker_core::DeckError;
use std::io;
use thiserror::Error;

/// 单个会话的失败原因。只会关闭出错的那一个连接。
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("连接 I/O 错误: {0}")]
    Io(#[from] io::Error),

    #[error("客户端关闭了连接")]
    Closed,

    #[error("单行超过 {0} 字节")]
    LineTooLong(usize),

    #[error("无法解析换牌数量: {0:?}")]
    MalformedCount(String),

    #[error(transparent)]
    Deck(#[from] DeckError),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("无法监听端口 {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },

    #[error("I/O 错误: {0}")]
    Io(#[from] io::Error),
}
