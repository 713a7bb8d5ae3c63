//! 题库存储接口 - 基础设施层
//!
//! 存储边界上的错误只记录日志，转换为空结果或失败标记，不向上抛出，
//! 这样某个难度的失败不会影响其他难度

use std::collections::BTreeSet;

use async_trait::async_trait;

use crate::error::StoreError;
use crate::models::QuestionRecord;

/// 题库存储
#[async_trait]
pub trait QuestionStore: Send + Sync {
    /// 检查存储是否可达
    async fn ping(&self) -> Result<(), StoreError>;

    /// 批量写入题目
    ///
    /// 返回写入数量；写入失败返回 `None`。空列表直接返回 `Some(0)`
    async fn insert(&self, records: &[QuestionRecord]) -> Option<usize>;

    /// 按主题精确匹配、难度前缀（大小写不敏感）匹配查询，最多返回 `limit` 条
    async fn query(&self, topic: &str, difficulty_prefix: &str, limit: usize)
        -> Vec<QuestionRecord>;

    /// 主题下出现过的所有难度标签
    async fn distinct_difficulties(&self, topic: &str) -> BTreeSet<String>;
}

/// 难度前缀对应的正则（锚定开头，标签按字面匹配）
pub fn difficulty_prefix_pattern(prefix: &str) -> String {
    format!("^{}", regex::escape(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_pattern_is_anchored_and_escaped() {
        assert_eq!(difficulty_prefix_pattern("Easy"), "^Easy");
        assert_eq!(difficulty_prefix_pattern("Medium+"), r"^Medium\+");
    }
}
