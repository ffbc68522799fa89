//! # 五张抽牌核心库
//!
//! 这个 `core` crate 只包含与网络无关的部分：牌的标识、共享牌堆的
//! 发牌/归还操作，以及提示性质的轮次计数器。
//! 服务器和客户端都依赖它，但它本身不做任何 I/O。

mod card;
mod deck;
mod turn;

pub use card::*;

pub use deck::*;

pub use turn::*;
