//! 难度处理上下文
//!
//! 封装"我正在处理哪个主题的哪个难度、要几道题"这一信息

use std::fmt::Display;

use crate::models::Difficulty;

/// 难度处理上下文
#[derive(Debug, Clone)]
pub struct TierCtx {
    /// 主题
    pub topic: String,

    /// 难度
    pub tier: Difficulty,

    /// 请求的题目数量
    pub count: usize,
}

impl TierCtx {
    pub fn new(topic: impl Into<String>, tier: Difficulty, count: usize) -> Self {
        Self {
            topic: topic.into(),
            tier,
            count,
        }
    }
}

impl Display for TierCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[主题 {} 难度 {} 数量 {}]",
            self.topic,
            self.tier.label(),
            self.count
        )
    }
}
