//! 单个难度的选题流程 - 流程层
//!
//! 流程顺序：按回退顺序查询题池 → 检查数量 → 无放回随机抽取

use std::sync::Arc;

use rand::seq::index;
use rand::Rng;
use tracing::{debug, info, warn};

use crate::error::PaperError;
use crate::infrastructure::QuestionStore;
use crate::models::QuestionRecord;
use crate::workflow::tier_ctx::TierCtx;

/// 单个难度的选题流程
pub struct TierSelection {
    store: Arc<dyn QuestionStore>,
    oversample_factor: usize,
}

impl TierSelection {
    pub fn new(store: Arc<dyn QuestionStore>, oversample_factor: usize) -> Self {
        Self {
            store,
            oversample_factor: oversample_factor.max(1),
        }
    }

    /// 查询候选题池
    ///
    /// 依次尝试难度的回退标签，第一个非空结果即为题池，不合并多个标签的结果
    pub async fn collect_pool(&self, ctx: &TierCtx) -> Vec<QuestionRecord> {
        let limit = ctx.count.saturating_mul(self.oversample_factor);

        for (attempt, label) in ctx.tier.fallback_labels().iter().enumerate() {
            let pool = self.store.query(&ctx.topic, label, limit).await;
            if !pool.is_empty() {
                if attempt > 0 {
                    warn!("{} ⚠️ 没有 {} 题目，改用 {} 题目", ctx, ctx.tier.label(), label);
                }
                debug!("{} 题池来自 {}，共 {} 道", ctx, label, pool.len());
                return pool;
            }
        }

        Vec::new()
    }

    /// 选出 `ctx.count` 道题目，题池不足时返回错误，不做部分填充
    ///
    /// 数量为 0 时不查询题库
    pub async fn run<R>(&self, ctx: &TierCtx, rng: &mut R) -> Result<Vec<QuestionRecord>, PaperError>
    where
        R: Rng + ?Sized,
    {
        if ctx.count == 0 {
            return Ok(Vec::new());
        }

        let pool = self.collect_pool(ctx).await;

        if pool.len() < ctx.count {
            return Err(PaperError::InsufficientQuestions {
                topic: ctx.topic.clone(),
                tier: ctx.tier,
                required: ctx.count,
                available: pool.len(),
            });
        }

        let selected = sample_without_replacement(pool, ctx.count, rng);
        info!("{} ✓ 已选出 {} 道题目", ctx, selected.len());
        Ok(selected)
    }
}

/// 从题池中均匀随机地无放回抽取 `count` 道题，按抽取顺序返回
pub fn sample_without_replacement<T, R>(pool: Vec<T>, count: usize, rng: &mut R) -> Vec<T>
where
    R: Rng + ?Sized,
{
    let count = count.min(pool.len());
    let indices = index::sample(rng, pool.len(), count);
    let mut slots: Vec<Option<T>> = pool.into_iter().map(Some).collect();
    indices.iter().filter_map(|i| slots[i].take()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::MemoryStore;
    use crate::models::question::sample_record;
    use crate::models::Difficulty;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn selection(store: Arc<MemoryStore>) -> TierSelection {
        TierSelection::new(store, 3)
    }

    fn records(topic: &str, difficulty: &str, range: std::ops::Range<usize>) -> Vec<QuestionRecord> {
        range.map(|n| sample_record(n, topic, difficulty)).collect()
    }

    #[test]
    fn test_sample_without_replacement_has_no_duplicates() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let picked = sample_without_replacement((0..10).collect(), 4, &mut rng);
            assert_eq!(picked.len(), 4);
            let unique: HashSet<_> = picked.iter().collect();
            assert_eq!(unique.len(), 4);
            assert!(picked.iter().all(|n| *n < 10));
        }
    }

    #[test]
    fn test_sample_reaches_every_element() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut seen = HashSet::new();
        for _ in 0..200 {
            seen.extend(sample_without_replacement((0..6).collect::<Vec<u32>>(), 1, &mut rng));
        }
        assert_eq!(seen.len(), 6);
    }

    #[tokio::test]
    async fn test_zero_count_does_not_query() {
        let store = Arc::new(MemoryStore::with_records(records("Algebra", "Easy", 0..5)));
        let mut rng = StdRng::seed_from_u64(1);

        let picked = selection(store.clone())
            .run(&TierCtx::new("Algebra", Difficulty::Easy, 0), &mut rng)
            .await
            .unwrap();

        assert!(picked.is_empty());
        assert_eq!(store.query_count(), 0);
    }

    #[tokio::test]
    async fn test_pool_is_limited_by_oversample_factor() {
        let store = Arc::new(MemoryStore::with_records(records("Algebra", "Hard", 0..20)));
        let pool = selection(store)
            .collect_pool(&TierCtx::new("Algebra", Difficulty::Hard, 2))
            .await;
        assert_eq!(pool.len(), 6);
    }

    #[tokio::test]
    async fn test_easy_falls_back_to_medium_without_merging() {
        let store = Arc::new(MemoryStore::with_records(records("Algebra", "Medium", 0..4)));
        let mut rng = StdRng::seed_from_u64(3);

        let picked = selection(store.clone())
            .run(&TierCtx::new("Algebra", Difficulty::Easy, 4), &mut rng)
            .await
            .unwrap();

        assert_eq!(picked.len(), 4);
        assert!(picked.iter().all(|q| q.difficulty == "Medium"));
        assert_eq!(store.query_count(), 2);
    }

    #[tokio::test]
    async fn test_easy_pool_found_first_is_not_topped_up_from_medium() {
        let mut seeded = records("Algebra", "Easy", 0..1);
        seeded.extend(records("Algebra", "Medium", 1..10));
        let store = Arc::new(MemoryStore::with_records(seeded));
        let mut rng = StdRng::seed_from_u64(3);

        let err = selection(store.clone())
            .run(&TierCtx::new("Algebra", Difficulty::Easy, 2), &mut rng)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PaperError::InsufficientQuestions {
                topic: "Algebra".to_string(),
                tier: Difficulty::Easy,
                required: 2,
                available: 1,
            }
        );
        assert_eq!(store.query_count(), 1);
    }

    #[tokio::test]
    async fn test_medium_never_falls_back() {
        let store = Arc::new(MemoryStore::with_records(records("Algebra", "Easy", 0..10)));
        let mut rng = StdRng::seed_from_u64(9);

        let err = selection(store.clone())
            .run(&TierCtx::new("Algebra", Difficulty::Medium, 2), &mut rng)
            .await
            .unwrap_err();

        assert_eq!(
            err,
            PaperError::InsufficientQuestions {
                topic: "Algebra".to_string(),
                tier: Difficulty::Medium,
                required: 2,
                available: 0,
            }
        );
        assert_eq!(store.query_count(), 1);
    }

    #[test]
    fn test_sample_count_larger_than_pool_returns_whole_pool() {
        let mut rng = StdRng::seed_from_u64(13);
        let mut picked = sample_without_replacement(vec![3, 1, 2], 5, &mut rng);
        picked.sort();
        assert_eq!(picked, vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_hard_never_falls_back() {
        let store = Arc::new(MemoryStore::with_records(records("Algebra", "Medium", 0..10)));
        let mut rng = StdRng::seed_from_u64(5);

        let err = selection(store)
            .run(&TierCtx::new("Algebra", Difficulty::Hard, 1), &mut rng)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            PaperError::InsufficientQuestions { required: 1, available: 0, .. }
        ));
    }
}
