use std::sync::Arc;

use draw_poker_core::{Deck, TurnTracker};
use draw_poker_server::console::{self, ConsoleExit};
use draw_poker_server::{config, net, server, Table};
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = tokio::io::stdout();
    let config = config::prompt_config(&mut stdin, &mut stdout).await?;
    info!("端口 {}，连接数 {}", config.port, config.connections);

    let listener = server::bind(config.port).await?;
    tokio::spawn(net::log_addresses(config.port));

    // 牌堆在启动时洗一次，之后只随换牌变化
    let table = Arc::new(Table::new(Deck::shuffled(&mut rand::rng())));
    let turns = TurnTracker::new(config.connections);

    let acceptor = tokio::spawn(server::accept_clients(listener, config.connections, table.clone()));

    match console::run(&mut stdin, &table, &turns).await? {
        ConsoleExit::Quit => Ok(()),
        ConsoleExit::InputClosed => {
            info!("控制台输入已关闭，服务器继续运行");
            server::join_sessions(acceptor.await?).await;
            Ok(())
        }
    }
}
