use anyhow::Result;
use quiz_paper::utils::logging;
use quiz_paper::{App, Config};
use tracing::error;

#[tokio::main]
async fn main() -> Result<()> {
    // 读取 .env（不存在时忽略）
    dotenvy::dotenv().ok();

    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(&config)?;

    // 初始化并运行应用
    let app = App::initialize(config).await?;

    let papers = match app.run().await {
        Ok(papers) => papers,
        Err(e) => {
            error!("❌ 运行失败: {}", e);
            return Err(e.into());
        }
    };

    for paper in &papers {
        println!("{}", serde_json::to_string_pretty(paper)?);
    }

    Ok(())
}
