use crate::card::{full_deck, Card};
use rand::prelude::SliceRandom;
use rand::Rng;
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    /// 请求的张数超过牌堆剩余
    #[error("牌堆不足: 请求 {requested} 张, 剩余 {remaining} 张")]
    Exhausted { requested: usize, remaining: usize },
    /// 归还的牌已经在牌堆里（或同一批里重复出现）
    #[error("牌 {0} 已在牌堆中")]
    Duplicate(Card),
}

/// 牌堆 (Deck)
///
/// 发牌从顶部（`Vec` 尾部）取，归还的牌放到底部（`Vec` 头部），
/// 这样刚交回的牌不会马上又被发回去。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        Self::new()
    }
}

impl Deck {
    /// 创建一副完整的 52 张牌（未洗）
    pub fn new() -> Self {
        Deck { cards: full_deck() }
    }

    /// 创建并洗好一副牌
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut deck = Self::new();
        deck.shuffle(rng);
        deck
    }

    /// 重新填满 52 张牌，丢弃原有内容
    pub fn initialize(&mut self) {
        self.cards = full_deck();
    }

    /// 一次均匀的 Fisher-Yates 洗牌
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.cards.shuffle(rng);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn contains(&self, card: &Card) -> bool {
        self.cards.contains(card)
    }

    /// 从底到顶的当前顺序
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// 从顶部发 `count` 张牌，按发出的顺序返回。
    /// 牌不够时返回错误且牌堆不变。
    pub fn deal_hand(&mut self, count: usize) -> Result<Vec<Card>, DeckError> {
        let remaining = self.cards.len();
        if count > remaining {
            return Err(DeckError::Exhausted { requested: count, remaining });
        }
        let mut hand = self.cards.split_off(remaining - count);
        hand.reverse();
        Ok(hand)
    }

    /// 把一批牌放回牌堆底部。任何一张重复都会让整批被拒绝。
    pub fn return_cards(&mut self, cards: &[Card]) -> Result<(), DeckError> {
        self.check_returnable(cards)?;
        self.cards.splice(0..0, cards.iter().copied());
        Ok(())
    }

    /// 先归还再发牌，作为一个整体：任何检查失败时牌堆保持原样。
    pub fn exchange(&mut self, returned: &[Card], count: usize) -> Result<Vec<Card>, DeckError> {
        let available = self.cards.len() + returned.len();
        if count > available {
            return Err(DeckError::Exhausted { requested: count, remaining: available });
        }
        self.return_cards(returned)?;
        self.deal_hand(count)
    }

    fn check_returnable(&self, cards: &[Card]) -> Result<(), DeckError> {
        let mut seen = HashSet::with_capacity(cards.len());
        for card in cards {
            if !seen.insert(*card) || self.contains(card) {
                return Err(DeckError::Duplicate(*card));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::card::{Rank, Suit, DECK_SIZE};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn test_new_deck_has_52_unique_cards() {
        let deck = Deck::new();
        assert_eq!(deck.len(), DECK_SIZE);
        let unique: HashSet<_> = deck.cards().iter().collect();
        assert_eq!(unique.len(), DECK_SIZE);
    }

    #[test]
    fn test_shuffle_keeps_composition() {
        let deck = Deck::shuffled(&mut rng());
        let mut sorted = deck.cards().to_vec();
        sorted.sort();
        let mut fresh = Deck::new().cards().to_vec();
        fresh.sort();
        assert_eq!(sorted, fresh);
    }

    #[test]
    fn test_initialize_refills() {
        let mut deck = Deck::shuffled(&mut rng());
        deck.deal_hand(20).unwrap();
        deck.initialize();
        assert_eq!(deck, Deck::new());
    }

    #[test]
    fn test_deal_five_from_fresh_deck() {
        let mut deck = Deck::shuffled(&mut rng());
        let hand = deck.deal_hand(5).unwrap();
        assert_eq!(hand.len(), 5);
        assert_eq!(deck.len(), 47);

        let unique: HashSet<_> = hand.iter().collect();
        assert_eq!(unique.len(), 5);
        for card in &hand {
            assert!(!deck.contains(card));
        }
    }

    #[test]
    fn test_deal_zero_is_noop() {
        let mut deck = Deck::shuffled(&mut rng());
        let before = deck.clone();
        assert!(deck.deal_hand(0).unwrap().is_empty());
        assert_eq!(deck, before);
    }

    #[test]
    fn test_deal_takes_from_top_in_order() {
        let mut deck = Deck::new();
        let top: Vec<Card> = deck.cards().iter().rev().take(3).copied().collect();
        assert_eq!(deck.deal_hand(3).unwrap(), top);
    }

    #[test]
    fn test_deal_too_many_leaves_deck_untouched() {
        let mut deck = Deck::shuffled(&mut rng());
        deck.deal_hand(50).unwrap();
        let before = deck.clone();
        assert_eq!(
            deck.deal_hand(3),
            Err(DeckError::Exhausted { requested: 3, remaining: 2 })
        );
        assert_eq!(deck, before);
    }

    #[test]
    fn test_deal_entire_deck() {
        let mut deck = Deck::shuffled(&mut rng());
        let all = deck.deal_hand(DECK_SIZE).unwrap();
        assert_eq!(all.len(), DECK_SIZE);
        assert!(deck.is_empty());
    }

    #[test]
    fn test_returned_cards_go_to_bottom() {
        let mut deck = Deck::shuffled(&mut rng());
        let hand = deck.deal_hand(2).unwrap();
        deck.return_cards(&hand).unwrap();
        assert_eq!(deck.len(), DECK_SIZE);
        assert_eq!(&deck.cards()[..2], &hand[..]);
    }

    #[test]
    fn test_return_rejects_card_already_in_deck() {
        let mut deck = Deck::new();
        let card = Card::new(Suit::Clubs, Rank::Ace);
        assert_eq!(deck.return_cards(&[card]), Err(DeckError::Duplicate(card)));
        assert_eq!(deck.len(), DECK_SIZE);
    }

    #[test]
    fn test_return_rejects_duplicates_in_batch() {
        let mut deck = Deck::new();
        let hand = deck.deal_hand(2).unwrap();
        let before = deck.clone();
        let batch = [hand[0], hand[1], hand[0]];
        assert_eq!(deck.return_cards(&batch), Err(DeckError::Duplicate(hand[0])));
        assert_eq!(deck, before);
    }

    #[test]
    fn test_exchange_keeps_size() {
        let mut deck = Deck::shuffled(&mut rng());
        let hand = deck.deal_hand(5).unwrap();
        let size = deck.len();

        let new_cards = deck.exchange(&hand[..3], 3).unwrap();
        assert_eq!(new_cards.len(), 3);
        assert_eq!(deck.len(), size);
        for card in &new_cards {
            assert!(!deck.contains(card));
        }
    }

    #[test]
    fn test_exchange_return_then_deal_preserves_composition() {
        let mut deck = Deck::shuffled(&mut rng());
        let hand = deck.deal_hand(4).unwrap();
        let new_cards = deck.exchange(&hand, 4).unwrap();

        let mut total: Vec<Card> = deck.cards().to_vec();
        total.extend(&new_cards);
        total.sort();
        let mut fresh = full_deck();
        fresh.sort();
        assert_eq!(total, fresh);
    }

    #[test]
    fn test_exchange_can_use_returned_cards_when_deck_is_short() {
        let mut deck = Deck::shuffled(&mut rng());
        let held = deck.deal_hand(DECK_SIZE - 1).unwrap();
        let dealt = deck.exchange(&held[..2], 3).unwrap();
        assert_eq!(dealt.len(), 3);
        assert!(deck.is_empty());
    }

    #[test]
    fn test_exchange_failure_is_atomic() {
        let mut deck = Deck::shuffled(&mut rng());
        let held = deck.deal_hand(50).unwrap();
        let before = deck.clone();

        assert_eq!(
            deck.exchange(&held[..1], 4),
            Err(DeckError::Exhausted { requested: 4, remaining: 3 })
        );
        assert_eq!(deck, before);

        let in_deck = deck.cards()[0];
        assert_eq!(deck.exchange(&[in_deck], 1), Err(DeckError::Duplicate(in_deck)));
        assert_eq!(deck, before);
    }
}
