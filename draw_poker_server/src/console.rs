use std::io;

use draw_poker_core::TurnTracker;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

use crate::table::Table;

/// 控制台循环结束的原因
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleExit {
    Quit,
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    NextTurn,
    ShowTurn,
    Status,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Option<Command> {
        match line.trim() {
            "next" => Some(Command::NextTurn),
            "turn" => Some(Command::ShowTurn),
            "status" => Some(Command::Status),
            "quit" | "exit" => Some(Command::Quit),
            _ => None,
        }
    }
}

/// 执行一条命令，返回要展示给操作员的文本
pub fn execute(command: Command, table: &Table, turns: &TurnTracker) -> String {
    match command {
        Command::NextTurn => format!("轮到玩家 {}", turns.next_turn()),
        Command::ShowTurn => format!("当前轮到玩家 {}", turns.current()),
        Command::Status => serde_json::to_string(&table.snapshot(turns))
            .unwrap_or_else(|e| format!("无法生成状态: {}", e)),
        Command::Quit => "服务器即将退出".to_string(),
    }
}

/// 读取操作员命令，直到 `quit` 或输入结束
pub async fn run<R>(input: &mut R, table: &Table, turns: &TurnTracker) -> io::Result<ConsoleExit>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match Command::parse(&line) {
            Some(command) => {
                let reply = execute(command, table, turns);
                info!("{}", reply);
                if command == Command::Quit {
                    return Ok(ConsoleExit::Quit);
                }
            }
            None => warn!("未知命令: {} (可用: next, turn, status, quit)", line.trim()),
        }
    }
    Ok(ConsoleExit::InputClosed)
}
