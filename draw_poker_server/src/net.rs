use std::io;
use std::net::IpAddr;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tokio::time::timeout;
use tracing::{info, warn};

const PUBLIC_IP_HOST: &str = "checkip.amazonaws.com";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(3);

/// 本机对外使用的地址。UDP 的 connect 不会真的发出数据包。
pub async fn local_ip() -> io::Result<IpAddr> {
    let socket = UdpSocket::bind("0.0.0.0:0").await?;
    socket.connect("8.8.8.8:80").await?;
    Ok(socket.local_addr()?.ip())
}

/// 通过 checkip 服务查询公网地址
pub async fn public_ip() -> io::Result<IpAddr> {
    let lookup = async {
        let mut stream = TcpStream::connect((PUBLIC_IP_HOST, 80)).await?;
        let request = format!(
            "GET / HTTP/1.0\r\nHost: {}\r\nConnection: close\r\n\r\n",
            PUBLIC_IP_HOST
        );
        stream.write_all(request.as_bytes()).await?;
        let mut response = String::new();
        stream.read_to_string(&mut response).await?;
        parse_checkip_response(&response)
    };
    timeout(LOOKUP_TIMEOUT, lookup)
        .await
        .map_err(|_| io::Error::new(io::ErrorKind::TimedOut, "公网地址查询超时"))?
}

fn parse_checkip_response(response: &str) -> io::Result<IpAddr> {
    let body = response
        .split_once("\r\n\r\n")
        .map(|(_, body)| body)
        .unwrap_or(response);
    body.trim()
        .parse()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// 只用于给操作员展示，失败不影响服务器运行
pub async fn log_addresses(port: u16) {
    match local_ip().await {
        Ok(ip) => info!("本地地址: {}:{}", ip, port),
        Err(e) => warn!("无法获取本地地址: {}", e),
    }
    match public_ip().await {
        Ok(ip) => info!("公网地址: {}:{}", ip, port),
        Err(e) => warn!("无法获取公网地址: {}", e),
    }
}
