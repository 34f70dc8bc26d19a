use anyhow::Context;
use clap::Parser;
use feed_search_api::api::server::start_server;
use feed_search_api::utils::{logger, validation::Validate};
use feed_search_api::{AppConfig, AppState, CliArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // 載入 TOML 配置
    let mut config = match AppConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(args.verbose, &config.logging);
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(port) = args.port {
        config.server.port = port;
        tracing::info!("🔧 Port overridden to: {}", port);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    if args.check {
        println!("✅ Configuration is valid");
        return Ok(());
    }

    let state = AppState::from_config(&config)
        .await
        .context("failed to initialize application state")?;

    start_server(state, &config.server.address())
        .await
        .with_context(|| format!("server on {} failed", config.server.address()))?;

    Ok(())
}
