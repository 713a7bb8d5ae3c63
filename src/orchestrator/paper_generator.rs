//! 组卷器 - 编排层
//!
//! ## 职责
//!
//! 本模块按难度分布从题库中抽题组成试卷，是整个系统的核心。
//!
//! ## 核心功能
//!
//! 1. **遍历难度**：固定顺序 easy → medium → hard
//! 2. **流程调度**：每个难度委托给 `TierSelection`（回退 → 校验 → 抽取）
//! 3. **整卷失败**：任意难度题目不足立即返回错误，不返回残缺试卷
//! 4. **多卷生成**：多次独立抽取，不保证试卷之间互不重复

use std::collections::BTreeSet;
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{error, info};

use crate::error::PaperError;
use crate::infrastructure::QuestionStore;
use crate::models::{DifficultyCounts, QuestionPaper};
use crate::workflow::{TierCtx, TierSelection};

/// 组卷器
pub struct PaperGenerator {
    store: Arc<dyn QuestionStore>,
    selection: TierSelection,
}

impl PaperGenerator {
    pub fn new(store: Arc<dyn QuestionStore>, oversample_factor: usize) -> Self {
        Self {
            selection: TierSelection::new(store.clone(), oversample_factor),
            store,
        }
    }

    /// 主题下题库中已有的难度标签
    pub async fn available_difficulties(&self, topic: &str) -> BTreeSet<String> {
        self.store.distinct_difficulties(topic).await
    }

    /// 组一份试卷
    pub async fn generate_question_paper(
        &self,
        topic: &str,
        counts: DifficultyCounts,
    ) -> Result<QuestionPaper, PaperError> {
        let mut rng = StdRng::from_entropy();
        self.generate_question_paper_with_rng(topic, counts, &mut rng)
            .await
    }

    /// 使用给定的随机数生成器组卷
    pub async fn generate_question_paper_with_rng<R>(
        &self,
        topic: &str,
        counts: DifficultyCounts,
        rng: &mut R,
    ) -> Result<QuestionPaper, PaperError>
    where
        R: Rng + ?Sized,
    {
        let available = self.available_difficulties(topic).await;
        info!("主题 {} 的可用难度: {:?}", topic, available);

        let mut paper = QuestionPaper::new(topic);

        for (tier, count) in counts.tiers() {
            let ctx = TierCtx::new(topic, tier, count);
            let selected = self.selection.run(&ctx, &mut *rng).await.inspect_err(|e| {
                error!("❌ 组卷失败: {}", e);
            })?;
            paper.questions.extend(selected);
        }

        info!("✅ 试卷生成完成: {} 道题目 ({})", paper.len(), counts);
        Ok(paper)
    }

    /// 组多份试卷
    ///
    /// 每份试卷独立抽取；任意一份失败即返回错误
    pub async fn generate_multiple_papers(
        &self,
        topic: &str,
        num_papers: usize,
        counts: DifficultyCounts,
    ) -> Result<Vec<QuestionPaper>, PaperError> {
        let mut rng = StdRng::from_entropy();
        let mut papers = Vec::with_capacity(num_papers);

        for index in 1..=num_papers {
            info!("📄 正在生成第 {}/{} 份试卷", index, num_papers);
            let paper = self
                .generate_question_paper_with_rng(topic, counts, &mut rng)
                .await?;
            papers.push(paper);
        }

        Ok(papers)
    }
}
