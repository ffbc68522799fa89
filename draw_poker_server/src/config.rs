use std::fmt::Display;
use std::io;
use std::str::FromStr;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

pub const DEFAULT_PORT: u16 = 22337;
pub const DEFAULT_CONNECTIONS: usize = 1;

/// 启动时由操作员输入的配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub connections: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig { port: DEFAULT_PORT, connections: DEFAULT_CONNECTIONS }
    }
}

/// 依次询问端口和连接数
pub async fn prompt_config<R, W>(input: &mut R, output: &mut W) -> io::Result<ServerConfig>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let port = prompt_number(input, output, "请输入端口", DEFAULT_PORT, |_| true).await?;
    let connections =
        prompt_number(input, output, "请输入连接数", DEFAULT_CONNECTIONS, |n| *n > 0).await?;
    Ok(ServerConfig { port, connections })
}

/// 读取一个数字：空行使用默认值，无效输入重新询问，输入结束也使用默认值。
pub async fn prompt_number<T, R, W>(
    input: &mut R,
    output: &mut W,
    label: &str,
    default: T,
    valid: impl Fn(&T) -> bool,
) -> io::Result<T>
where
    T: FromStr + Display + Copy,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    loop {
        output
            .write_all(format!("{} (回车使用默认值: {}): ", label, default).as_bytes())
            .await?;
        output.flush().await?;

        let mut line = String::new();
        if input.read_line(&mut line).await? == 0 {
            return Ok(default);
        }
        let text = line.trim();
        if text.is_empty() {
            return Ok(default);
        }
        match text.parse::<T>() {
            Ok(value) if valid(&value) => return Ok(value),
            _ => {
                warn!("无效的数字: {:?}", text);
                output.write_all(format!("无效的数字: {}\n", text).as_bytes()).await?;
            }
        }
    }
}
