use std::io::Write;

use draw_poker_core::Card;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tracing::warn;
use tracing_subscriber::EnvFilter;

const DEFAULT_ADDR: &str = "127.0.0.1:22337";
const HAND_SIZE: usize = 5;
// 空手时用来占位的行，服务器不会把它当作牌收回
const PLACEHOLDER: &str = "-";

type ServerLines = Lines<BufReader<OwnedReadHalf>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .init();

    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    print!("服务器地址 (回车使用默认值: {}): ", DEFAULT_ADDR);
    std::io::stdout().flush()?;
    let addr = stdin
        .next_line()
        .await?
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_ADDR.to_string());

    println!("正在连接到: {}", addr);
    let (read, mut write) = TcpStream::connect(&addr).await?.into_split();
    let mut server = BufReader::new(read).lines();
    let ordinal = server.next_line().await?.ok_or("服务器关闭了连接")?;
    println!("连接成功! 你是玩家 {}", ordinal.trim());

    let mut hand: Vec<Card> = Vec::with_capacity(HAND_SIZE);
    let placeholders = placeholder_lines(HAND_SIZE);
    let opening = exchange(&mut write, &mut server, &placeholders).await?;
    hand.extend(opening);

    println!("--- 五张抽牌客户端 ---");
    println!("输入要换掉的牌的序号（空格分隔），直接回车不换，exit 退出");

    loop {
        for (i, card) in hand.iter().enumerate() {
            println!("  [{}] {}", i, card);
        }
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = stdin.next_line().await? else { break };
        let line = line.trim();
        if line == "exit" {
            println!("正在断开连接...");
            break;
        }

        let mut indices = match parse_indices(line, hand.len()) {
            Some(indices) => indices,
            None => {
                println!("无效的序号: {}", line);
                continue;
            }
        };
        indices.sort_unstable();
        indices.dedup();

        let give: Vec<String> = indices.iter().map(|&i| hand[i].to_string()).collect();
        let dealt = exchange(&mut write, &mut server, &give).await?;
        for (&i, card) in indices.iter().zip(dealt) {
            hand[i] = card;
        }
    }

    Ok(())
}

fn placeholder_lines(n: usize) -> Vec<String> {
    (0..n).map(|_| PLACEHOLDER.to_string()).collect()
}

fn parse_indices(line: &str, len: usize) -> Option<Vec<usize>> {
    line.split_whitespace()
        .map(|s| s.parse::<usize>().ok().filter(|&i| i < len))
        .collect()
}

/// 发送一次换牌请求，读回同样数量的新牌
async fn exchange(
    write: &mut OwnedWriteHalf,
    server: &mut ServerLines,
    give: &[String],
) -> Result<Vec<Card>, Box<dyn std::error::Error>> {
    let mut payload = format!("{}\n", give.len());
    for card in give {
        payload.push_str(card);
        payload.push('\n');
    }
    write.write_all(payload.as_bytes()).await?;

    let mut dealt = Vec::with_capacity(give.len());
    while dealt.len() < give.len() {
        let line = server.next_line().await?.ok_or("服务器关闭了连接")?;
        let card = line
            .parse::<Card>()
            .inspect_err(|e| warn!("服务器发来无法识别的牌: {}", e))?;
        dealt.push(card);
    }
    Ok(dealt)
}
