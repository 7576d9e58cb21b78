use anyhow::Result;
use research_extract::utils::logging;
use research_extract::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用（命令行参数为待处理的 PDF 路径）
    let paths: Vec<String> = std::env::args().skip(1).collect();
    App::initialize(config)?.run(paths).await?;

    Ok(())
}
