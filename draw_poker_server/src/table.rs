use dashmap::DashMap;
use draw_poker_core::{Card, Deck, DeckError, TurnTracker};
use parking_lot::Mutex as P_Mutex;
use serde::Serialize;
use tracing::error;
use uuid::Uuid;

pub type SessionId = Uuid;

/// 服务器唯一的共享状态：牌堆，以及在线会话的登记表。
///
/// 牌堆的锁只覆盖集合操作本身，任何 I/O 都在锁外进行。
/// 登记表只用于状态展示，不参与换牌。
pub struct Table {
    deck: P_Mutex<Deck>,
    sessions: DashMap<SessionId, SessionInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionInfo {
    pub ordinal: usize,
    pub peer: String,
    pub held: Vec<Card>,
}

/// `status` 命令输出的快照
#[derive(Debug, Clone, Serialize)]
pub struct TableSnapshot {
    pub deck_size: usize,
    pub turn: usize,
    pub players: usize,
    pub sessions: Vec<SessionInfo>,
}

impl Table {
    pub fn new(deck: Deck) -> Self {
        Table {
            deck: P_Mutex::new(deck),
            sessions: DashMap::new(),
        }
    }

    /// 在一次加锁内完成归还和发牌
    pub fn exchange(&self, returned: &[Card], count: usize) -> Result<Vec<Card>, DeckError> {
        self.deck.lock().exchange(returned, count)
    }

    pub fn deck_size(&self) -> usize {
        self.deck.lock().len()
    }

    /// 当前牌堆内容的拷贝
    pub fn deck_cards(&self) -> Vec<Card> {
        self.deck.lock().cards().to_vec()
    }

    pub fn register(&self, id: SessionId, ordinal: usize, peer: String) {
        self.sessions.insert(id, SessionInfo { ordinal, peer, held: Vec::new() });
    }

    pub fn record_hand(&self, id: SessionId, held: &[Card]) {
        if let Some(mut info) = self.sessions.get_mut(&id) {
            info.held = held.to_vec();
        }
    }

    /// 会话结束：把它手里的牌放回牌堆并注销
    pub fn release(&self, id: SessionId, held: &[Card]) {
        let result = self.deck.lock().return_cards(held);
        if let Err(e) = result {
            error!("会话 {} 的手牌无法归还: {}", id, e);
        }
        self.sessions.remove(&id);
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn snapshot(&self, turns: &TurnTracker) -> TableSnapshot {
        let mut sessions: Vec<SessionInfo> = self.sessions.iter().map(|e| e.value().clone()).collect();
        sessions.sort_by_key(|s| s.ordinal);
        TableSnapshot {
            deck_size: self.deck_size(),
            turn: turns.current(),
            players: turns.players(),
            sessions,
        }
    }
}
