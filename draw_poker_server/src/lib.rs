//! 五张抽牌发牌服务器
//!
//! 一个监听端口，每个客户端一个任务，所有任务共享同一副牌。

pub mod config;
pub mod console;
pub mod error;
pub mod net;
pub mod server;
pub mod session;
pub mod table;

pub use config::ServerConfig;
pub use error::{ServerError, SessionError};
pub use table::{SessionId, Table, TableSnapshot};
