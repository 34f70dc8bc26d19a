use crate::config::toml_config::LoggingConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// `RUST_LOG` wins over the configured level; `--verbose` forces debug for this crate.
pub fn default_filter(verbose: bool, level: &str) -> String {
    if verbose {
        format!("feed_search_api=debug,tower_http=debug,{}", level)
    } else {
        format!("feed_search_api={level},tower_http={level}")
    }
}

pub fn init_logger(verbose: bool, config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose, &config.level)));

    let registry = tracing_subscriber::registry().with(filter);

    if config.json {
        // JSON 格式方便集中式日誌系統解析
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .json(),
            )
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_file(false)
                    .with_line_number(false)
                    .compact(),
            )
            .init();
    }
}
