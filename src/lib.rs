//! # Quiz Paper
//!
//! 调用 LLM 按难度生成选择题并存入 MongoDB，再按难度分布从题库中抽题组卷
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（数据库连接），只暴露增查能力
//! - `QuestionStore` - 题库接口，`MongoStore` / `MemoryStore` 两种实现
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 描述"我能做什么"
//! - `LlmService` - 调用一次 LLM
//! - `prompt` / `response_parser` - 提示词与响应解析
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个难度"的完整处理流程
//! - `TierGeneration` - 出题（prompt → LLM → 解析）
//! - `TierSelection` - 选题（回退 → 校验 → 随机抽取）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/question_generator` - 遍历难度出题并批量入库
//! - `orchestrator/paper_generator` - 遍历难度组卷

pub mod app;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::{App, ConnectionStatus};
pub use config::Config;
pub use error::{AppError, AppResult, PaperError};
pub use infrastructure::{MemoryStore, MongoStore, QuestionStore};
pub use models::{Difficulty, DifficultyCounts, QuestionPaper, QuestionRecord};
pub use orchestrator::{GenerationReport, PaperGenerator, QuestionGenerator};
