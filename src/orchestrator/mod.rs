//! 编排层（Orchestration Layer）
//!
//! ## 模块划分
//!
//! ### `question_generator` - 题目生成器
//! - 按难度依次调用 `TierGeneration`
//! - 收集各难度的失败，不中断其他难度
//! - 汇总后一次性写入题库
//!
//! ### `paper_generator` - 组卷器
//! - 按难度依次调用 `TierSelection`
//! - 任意难度题目不足时整卷失败
//!
//! ## 层次关系
//!
//! ```text
//! question_generator / paper_generator (处理全部难度)
//!     ↓
//! workflow::TierGeneration / TierSelection (处理单个难度)
//!     ↓
//! services (能力层：llm / prompt / parser)
//!     ↓
//! infrastructure (基础设施：QuestionStore)
//! ```

pub mod paper_generator;
pub mod question_generator;

pub use paper_generator::PaperGenerator;
pub use question_generator::{GenerationReport, QuestionGenerator, TierFailure};
