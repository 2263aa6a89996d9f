use anyhow::Result;
use learning_pipeline::utils::logging;
use learning_pipeline::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志
    logging::init();

    // 加载配置
    let config = Config::load()?;

    // 初始化并运行应用
    App::initialize(config)?.run().await?;

    Ok(())
}
