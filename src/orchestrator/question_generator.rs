//! 题目生成器 - 编排层
//!
//! ## 职责
//!
//! 1. **遍历难度**：按 easy → medium → hard 依次出题，数量为 0 的难度跳过
//! 2. **故障隔离**：某个难度失败只记录到报告中，不影响其他难度
//! 3. **批量入库**：所有难度的题目汇总后一次性写入题库
//! 4. **统计输出**：记录每个难度的成功/失败情况

use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use crate::infrastructure::QuestionStore;
use crate::models::{Difficulty, DifficultyCounts, QuestionRecord};
use crate::services::GenerationService;
use crate::workflow::{TierCtx, TierGeneration};

/// 某个难度生成失败的记录
#[derive(Debug, Clone, Serialize)]
pub struct TierFailure {
    pub tier: Difficulty,
    pub reason: String,
}

/// 一次生成的结果
#[derive(Debug, Clone, Serialize)]
pub struct GenerationReport {
    pub topic: String,
    /// 通过校验的题目
    pub questions: Vec<QuestionRecord>,
    /// 实际写入数量；写入失败或没有题目时为 `None`
    pub inserted: Option<usize>,
    pub failures: Vec<TierFailure>,
}

impl GenerationReport {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.inserted == Some(self.questions.len())
    }

    /// 某个难度生成的题目数量（按生成时的难度归类）
    pub fn count_for(&self, tier: Difficulty) -> usize {
        self.questions
            .iter()
            .filter(|q| q.difficulty.to_lowercase().starts_with(tier.key()))
            .count()
    }
}

/// 题目生成器
pub struct QuestionGenerator {
    tier_generation: TierGeneration,
    store: Arc<dyn QuestionStore>,
}

impl QuestionGenerator {
    pub fn new(service: Arc<dyn GenerationService>, store: Arc<dyn QuestionStore>) -> Self {
        Self {
            tier_generation: TierGeneration::new(service),
            store,
        }
    }

    /// 为主题生成题目并写入题库
    ///
    /// 任何单个难度的失败（服务不可用、响应格式错误）都不会中断整个生成过程
    pub async fn generate_questions(&self, topic: &str, counts: DifficultyCounts) -> GenerationReport {
        info!("🚀 开始生成题目");
        info!("主题: {}", topic);
        info!("难度分布 - {}", counts);

        let mut questions = Vec::new();
        let mut failures = Vec::new();

        for (tier, count) in counts.tiers() {
            if count == 0 {
                continue;
            }

            let ctx = TierCtx::new(topic, tier, count);
            match self.tier_generation.run(&ctx).await {
                Ok(generated) => questions.extend(generated),
                Err(e) => failures.push(TierFailure {
                    tier,
                    reason: e.to_string(),
                }),
            }
        }

        let inserted = if questions.is_empty() {
            warn!("⚠️ 没有生成任何题目，跳过写入");
            None
        } else {
            let inserted = self.store.insert(&questions).await;
            match inserted {
                Some(n) => info!("💾 已写入 {} 道题目", n),
                None => warn!("❌ 题目写入失败，本次生成的 {} 道题目未保存", questions.len()),
            }
            inserted
        };

        for failure in &failures {
            warn!("⚠️ {} 难度生成失败: {}", failure.tier.label(), failure.reason);
        }

        GenerationReport {
            topic: topic.to_string(),
            questions,
            inserted,
            failures,
        }
    }
}
