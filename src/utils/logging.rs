/// 日志工具模块
///
/// 初始化 tracing，同时输出到终端和日志文件，并提供日志格式化的辅助函数
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::models::{DifficultyCounts, QuestionPaper};
use crate::orchestrator::GenerationReport;

/// 初始化日志
///
/// `RUST_LOG` 优先；否则默认 `info`，开启详细日志时为 `debug`
pub fn init(config: &Config) -> Result<()> {
    init_log_file(&config.output_log_file)?;

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.output_log_file)
        .with_context(|| format!("无法打开日志文件: {}", config.output_log_file))?;

    let default_level = if config.verbose_logging { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stdout.and(Mutex::new(file)))
        .try_init()
        .map_err(|e| anyhow::anyhow!("日志初始化失败: {}", e))?;

    Ok(())
}

/// 在日志文件中写入本次运行的分隔头
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n题目生成日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_file_path)
        .with_context(|| format!("无法创建日志文件: {}", log_file_path))?;
    file.write_all(log_header.as_bytes())?;
    Ok(())
}

/// 记录程序启动信息
pub fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 题目生成与组卷");
    info!("📚 主题: {}", config.topic);
    info!("🤖 模型: {}", config.llm_model_name);
    info!("🗄️ 题库: {}/{}", config.database_name, config.collection_name);
    info!("{}", "=".repeat(60));
}

/// 记录生成结果
pub fn log_generation_report(report: &GenerationReport, requested: DifficultyCounts) {
    info!("\n{}", "─".repeat(60));
    info!("📊 题目生成统计 ({})", report.topic);
    info!("请求: {}", requested);
    info!("✅ 生成: {}/{}", report.questions.len(), requested.total());
    match report.inserted {
        Some(n) => info!("💾 入库: {}", n),
        None => info!("💾 入库: 未写入"),
    }
    for failure in &report.failures {
        info!("❌ {}: {}", failure.tier.label(), truncate_text(&failure.reason, 120));
    }
    info!("{}", "─".repeat(60));
}

/// 记录试卷内容摘要
pub fn log_paper(index: usize, paper: &QuestionPaper) {
    info!("\n📄 试卷 {} - {} ({} 道题目)", index, paper.topic, paper.len());
    for (n, question) in paper.questions.iter().enumerate() {
        info!("  {}. {}", n + 1, question);
    }
}

/// 截断长文本用于日志显示
///
/// # 参数
/// - `text`: 原始文本
/// - `max_len`: 最大长度
///
/// # 返回
/// 返回截断后的文本
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() > max_len {
        text.chars().take(max_len).collect::<String>() + "..."
    } else {
        text.to_string()
    }
}
