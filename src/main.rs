use anyhow::Result;
use clap::Parser;
use potato_quality::cli::Cli;
use potato_quality::presentation::PromptConfirm;
use potato_quality::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 加载配置
    let config = Config::from_env();

    // 初始化日志
    logger::init(config.verbose_logging);

    // 初始化并执行命令
    let mut app = App::initialize(config)?;
    let output = app.run(cli.command, &mut PromptConfirm::stdio()).await?;
    println!("{}", output);

    Ok(())
}
