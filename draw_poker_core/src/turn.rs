use std::sync::atomic::{AtomicUsize, Ordering};

/// 轮次计数器 (Turn Tracker)
///
/// 只是提示性质的状态：服务器不会据此拒绝任何玩家的换牌请求。
#[derive(Debug, Default)]
pub struct TurnTracker {
    current: AtomicUsize,
    players: usize,
}

impl TurnTracker {
    pub fn new(players: usize) -> Self {
        TurnTracker { current: AtomicUsize::new(0), players }
    }

    pub fn players(&self) -> usize {
        self.players
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::Acquire)
    }

    /// 轮到下一位，按玩家数取模回绕，返回新的轮次
    pub fn next_turn(&self) -> usize {
        let players = self.players.max(1);
        let prev = self
            .current
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |cur| Some((cur + 1) % players))
            .unwrap_or_else(|cur| cur);
        (prev + 1) % players
    }

    /// 是否轮到第 `n` 位玩家
    pub fn query_turn(&self, n: usize) -> bool {
        self.current() == n
    }
}
