use std::sync::Arc;

use draw_poker_core::{Card, DeckError, DECK_SIZE};
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::SessionError;
use crate::table::{SessionId, Table};

/// 单行的最大字节数（不含换行）。牌名和数量都远小于这个长度。
pub const MAX_LINE_LEN: usize = 256;

/// 单个客户端连接的处理器
///
/// 协议循环：读数量 k → 读 k 张交回的牌 → 换牌 → 写回 k 张新牌。
pub struct Session<S> {
    id: SessionId,
    ordinal: usize,
    reader: BufReader<ReadHalf<S>>,
    writer: WriteHalf<S>,
    // 这个会话当前持有的牌，只有这些牌可以被交回
    held: Vec<Card>,
    table: Arc<Table>,
}

impl<S: AsyncRead + AsyncWrite> Session<S> {
    pub fn new(stream: S, ordinal: usize, table: Arc<Table>) -> Self {
        let (reader, writer) = tokio::io::split(stream);
        Session {
            id: Uuid::new_v4(),
            ordinal,
            reader: BufReader::new(reader),
            writer,
            held: Vec::new(),
            table,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// 握手后一直循环，直到连接出错或被关闭
    pub async fn run(&mut self) -> Result<(), SessionError> {
        let handshake = self.ordinal.to_string();
        self.send_lines(&[handshake]).await?;
        loop {
            let count = self.read_count().await?;
            let staged = self.read_cards(count).await?;
            let dealt = self.exchange(&staged, count)?;
            let lines: Vec<String> = dealt.iter().map(Card::to_string).collect();
            self.send_lines(&lines).await?;
        }
    }

    /// 归还手中所有的牌并注销，返回归还的张数
    pub fn close(&mut self) -> usize {
        let held = std::mem::take(&mut self.held);
        self.table.release(self.id, &held);
        held.len()
    }

    /// 读一行并去掉行尾，超过 `MAX_LINE_LEN` 的行直接让会话失败
    async fn next_line(&mut self) -> Result<String, SessionError> {
        let mut line = String::new();
        let limit = (MAX_LINE_LEN + 2) as u64;
        if (&mut self.reader).take(limit).read_line(&mut line).await? == 0 {
            return Err(SessionError::Closed);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        if line.len() > MAX_LINE_LEN {
            return Err(SessionError::LineTooLong(MAX_LINE_LEN));
        }
        Ok(line)
    }

    async fn read_count(&mut self) -> Result<usize, SessionError> {
        let line = self.next_line().await?;
        let text = line.trim();
        let count: usize = text
            .parse()
            .map_err(|_| SessionError::MalformedCount(text.to_string()))?;
        // 超过一整副牌的请求不可能满足，不必再读后面的行
        if count > DECK_SIZE {
            return Err(DeckError::Exhausted { requested: count, remaining: self.table.deck_size() }.into());
        }
        Ok(count)
    }

    async fn read_cards(&mut self, count: usize) -> Result<Vec<String>, SessionError> {
        let mut staged = Vec::with_capacity(count);
        while staged.len() < count {
            let line = self.next_line().await?;
            let name = line.trim();
            if !name.is_empty() {
                staged.push(name.to_string());
            }
        }
        Ok(staged)
    }

    fn exchange(&mut self, staged: &[String], count: usize) -> Result<Vec<Card>, SessionError> {
        let mut returned: Vec<Card> = Vec::with_capacity(staged.len());
        for name in staged {
            match name.parse::<Card>() {
                Ok(card) if self.held.contains(&card) && !returned.contains(&card) => returned.push(card),
                Ok(card) => warn!("玩家 {} 交回了未持有的牌 {}，已忽略", self.ordinal, card),
                Err(e) => debug!("玩家 {} 交回的行无法识别 ({})，已忽略", self.ordinal, e),
            }
        }

        let dealt = self.table.exchange(&returned, count)?;

        self.held.retain(|c| !returned.contains(c));
        self.held.extend_from_slice(&dealt);
        self.table.record_hand(self.id, &self.held);
        info!("玩家 {} 交回 {} 张，发出 {} 张", self.ordinal, returned.len(), dealt.len());
        Ok(dealt)
    }

    async fn send_lines(&mut self, lines: &[String]) -> Result<(), SessionError> {
        if lines.is_empty() {
            return Ok(());
        }
        let mut payload = lines.join("\n");
        payload.push('\n');
        self.writer.write_all(payload.as_bytes()).await?;
        self.writer.flush().await?;
        Ok(())
    }
}

/// 处理单个连接的完整生命周期。
///
/// 出错时只结束这一个会话：记录日志，手牌归还牌堆，其他会话不受影响。
pub async fn serve<S: AsyncRead + AsyncWrite>(stream: S, ordinal: usize, peer: String, table: Arc<Table>) {
    let mut session = Session::new(stream, ordinal, table.clone());
    table.register(session.id(), ordinal, peer.clone());
    info!("玩家 {} ({}) 已连接，会话 {}", ordinal, peer, session.id());

    match session.run().await {
        Ok(()) => {}
        Err(SessionError::Closed) => info!("玩家 {} 断开了连接", ordinal),
        Err(e) => warn!("玩家 {} 的会话因错误结束: {}", ordinal, e),
    }

    let returned = session.close();
    info!("玩家 {} 的 {} 张手牌已归还，牌堆剩余 {} 张", ordinal, returned, table.deck_size());
}
