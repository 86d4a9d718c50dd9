use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "partners-etl")]
#[command(about = "Sync Shopify Partner API events and transactions to JSON Lines")]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "partners-etl.toml")]
    pub config: String,

    /// Only verify credentials and application id
    #[arg(long)]
    pub check: bool,

    /// Print the stream catalog and exit
    #[arg(long)]
    pub list_streams: bool,

    /// Sync only this stream (repeatable, overrides [extract] streams)
    #[arg(long = "stream", value_name = "NAME")]
    pub streams: Vec<String>,

    /// Show what would be synced without calling the API
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub json_logs: bool,
}
