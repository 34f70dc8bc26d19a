use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "feed-search-api")]
#[command(about = "REST API with token auth, user admin and search over an external feed")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "feed-search.toml")]
    pub config: String,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Override server.port from the config
    #[arg(long)]
    pub port: Option<u16>,

    /// Validate the configuration and exit
    #[arg(long)]
    pub check: bool,
}
