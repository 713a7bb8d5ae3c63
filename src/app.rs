//! 应用入口
//!
//! 负责组装各层：配置 → 题库连接 → LLM 服务 → 生成器 / 组卷器。
//! 题库连接只在这里建立一次，之后注入到生成器和组卷器中共享

use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{error, info};

use crate::config::Config;
use crate::error::AppResult;
use crate::infrastructure::{MongoStore, QuestionStore};
use crate::models::{DifficultyCounts, QuestionPaper};
use crate::orchestrator::{GenerationReport, PaperGenerator, QuestionGenerator};
use crate::services::{GenerationService, LlmService};
use crate::utils::logging;

/// 连通性检查结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ConnectionStatus {
    pub store_ok: bool,
    pub llm_ok: bool,
}

impl ConnectionStatus {
    pub fn all_ok(&self) -> bool {
        self.store_ok && self.llm_ok
    }
}

/// 应用主结构
pub struct App {
    config: Config,
    store: Arc<dyn QuestionStore>,
    service: Arc<dyn GenerationService>,
    question_generator: QuestionGenerator,
    paper_generator: PaperGenerator,
}

impl App {
    /// 初始化应用
    ///
    /// 配置无效或题库不可达时直接失败
    pub async fn initialize(config: Config) -> Result<Self> {
        config.validate()?;

        let store = MongoStore::connect(&config).await?;
        info!("✅ 题库初始化成功");

        let service = LlmService::new(&config);
        info!("✅ LLM 客户端初始化成功 (模型: {})", service.model_name());

        Ok(Self::with_components(config, Arc::new(store), Arc::new(service)))
    }

    /// 使用已有的存储和生成服务组装应用
    pub fn with_components(
        config: Config,
        store: Arc<dyn QuestionStore>,
        service: Arc<dyn GenerationService>,
    ) -> Self {
        let question_generator = QuestionGenerator::new(service.clone(), store.clone());
        let paper_generator = PaperGenerator::new(store.clone(), config.oversample_factor());

        Self {
            config,
            store,
            service,
            question_generator,
            paper_generator,
        }
    }

    pub fn paper_generator(&self) -> &PaperGenerator {
        &self.paper_generator
    }

    /// 配置中的难度分布
    pub fn requested_counts(&self) -> DifficultyCounts {
        DifficultyCounts::new(
            self.config.num_easy,
            self.config.num_medium,
            self.config.num_hard,
        )
    }

    /// 检查题库和 LLM 是否可用
    pub async fn check_connections(&self) -> ConnectionStatus {
        info!("🔍 正在检查 LLM 和 MongoDB 连接...");

        let llm_ok = match self.service.ping().await {
            Ok(response) => {
                info!("✅ LLM 连接成功");
                info!("收到响应: {}", logging::truncate_text(&response, 200));
                true
            }
            Err(e) => {
                error!("❌ LLM 连接失败: {}", e);
                false
            }
        };

        let store_ok = match self.store.ping().await {
            Ok(()) => {
                info!("✅ MongoDB 连接成功");
                true
            }
            Err(e) => {
                error!("❌ MongoDB 连接失败: {}", e);
                false
            }
        };

        let status = ConnectionStatus { store_ok, llm_ok };
        if status.all_ok() {
            info!("✨ 所有连接正常");
        } else {
            info!("⚠️ 部分连接失败，请检查上面的日志");
        }
        status
    }

    /// 按配置生成题目
    pub async fn generate(&self) -> GenerationReport {
        let counts = self.requested_counts();
        let report = self
            .question_generator
            .generate_questions(&self.config.topic, counts)
            .await;
        logging::log_generation_report(&report, counts);
        report
    }

    /// 按配置组卷
    pub async fn assemble(&self) -> AppResult<Vec<QuestionPaper>> {
        let papers = self
            .paper_generator
            .generate_multiple_papers(
                &self.config.topic,
                self.config.num_papers,
                self.requested_counts(),
            )
            .await?;

        for (index, paper) in papers.iter().enumerate() {
            logging::log_paper(index + 1, paper);
        }
        Ok(papers)
    }

    /// 运行应用主逻辑：先生成题目入库，再从题库组卷
    pub async fn run(&self) -> AppResult<Vec<QuestionPaper>> {
        logging::log_startup(&self.config);

        self.generate().await;
        self.assemble().await
    }
}
