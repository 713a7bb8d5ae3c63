//! 单个难度的出题流程 - 流程层
//!
//! 流程顺序：构建提示词 → 调用 LLM → 解析 JSON → 补齐字段

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::error::LlmError;
use crate::models::QuestionRecord;
use crate::services::{build_question_prompt, parse_generated_questions, GenerationService, SYSTEM_PROMPT};
use crate::utils::logging::truncate_text;
use crate::workflow::tier_ctx::TierCtx;

/// 原始响应在日志中的最大长度
const RAW_LOG_LIMIT: usize = 2000;

/// 单个难度的出题流程
///
/// - 只处理一个难度
/// - 不写入题库
/// - 失败直接返回错误，由编排层决定是否继续
pub struct TierGeneration {
    service: Arc<dyn GenerationService>,
}

impl TierGeneration {
    pub fn new(service: Arc<dyn GenerationService>) -> Self {
        Self { service }
    }

    pub async fn run(&self, ctx: &TierCtx) -> Result<Vec<QuestionRecord>, LlmError> {
        info!("{} 正在生成 {} 道题目", ctx, ctx.count);

        let prompt = build_question_prompt(&ctx.topic, ctx.tier, ctx.count);

        let raw = self
            .service
            .generate_json(SYSTEM_PROMPT, &prompt)
            .await
            .inspect_err(|e| error!("{} ❌ 题目生成失败: {}", ctx, e))?;

        let mut questions = match parse_generated_questions(&raw) {
            Ok(questions) => questions,
            Err(e) => {
                error!("{} ❌ JSON 解析失败: {}", ctx, e);
                error!("原始内容: {}", truncate_text(&raw, RAW_LOG_LIMIT));
                return Err(e);
            }
        };

        for question in &mut questions {
            question.fill_defaults(&ctx.topic, ctx.tier.label());
            if !question.answer_matches_option() {
                warn!(
                    "{} ⚠️ 题目 {} 的正确答案 '{}' 与选项不对应",
                    ctx, question.question_number, question.correct_answer
                );
            }
        }

        if questions.len() != ctx.count {
            warn!(
                "{} ⚠️ 请求 {} 道题目，实际返回 {} 道",
                ctx,
                ctx.count,
                questions.len()
            );
        }

        info!("{} ✅ 成功生成 {} 道题目", ctx, questions.len());
        Ok(questions)
    }
}
