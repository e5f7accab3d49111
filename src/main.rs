//! certsweep - shared-folder sweep for certificate exports.
//!
//! Discovers files on a remote shared folder, pairs each machine-readable
//! certificate export with its printable counterpart, and forwards complete
//! pairs to the destination API.

use std::process::ExitCode;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tracing::error;

use certsweep::{
    parse_threshold, post_listing, run_listing, run_sweep, GatewayLister, HttpSender, Result,
    SendResult, ShareConfig, SweepConfig, TimeField,
};

#[derive(Parser)]
#[command(name = "certsweep")]
#[command(about = "Shared-folder sweep that pairs certificate exports and dispatches them")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Check if verbose mode is enabled (for early logging setup).
fn is_verbose() -> bool {
    std::env::args().any(|arg| arg == "-v" || arg == "--verbose")
}

#[derive(Args)]
struct ShareArgs {
    /// Base URL of the gateway fronting the share
    #[arg(long, env = "CERTSWEEP_GATEWAY_URL")]
    gateway_url: String,

    /// Share name
    #[arg(long, env = "CERTSWEEP_SHARE")]
    share: String,

    /// Username for the share
    #[arg(long, env = "CERTSWEEP_USERNAME")]
    username: String,

    /// Password for the share
    #[arg(long, env = "CERTSWEEP_PASSWORD", hide_env_values = true)]
    password: String,

    /// Authentication domain (optional)
    #[arg(long, env = "CERTSWEEP_DOMAIN")]
    domain: Option<String>,

    /// Folder to sweep, relative to the share root
    #[arg(long, default_value = "/")]
    folder_path: String,

    /// Only include files at or after this ISO-8601 instant
    /// (e.g. '2023-01-01T10:00:00+09:00')
    #[arg(long)]
    since: Option<String>,

    /// Which timestamp the threshold compares against
    #[arg(long, value_enum, default_value_t = TimeFieldArg::Modified)]
    time_field: TimeFieldArg,
}

#[derive(Clone, Copy, ValueEnum)]
enum TimeFieldArg {
    Modified,
    Created,
}

impl From<TimeFieldArg> for TimeField {
    fn from(value: TimeFieldArg) -> Self {
        match value {
            TimeFieldArg::Modified => TimeField::Modified,
            TimeFieldArg::Created => TimeField::Created,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the filtered listing as JSON without dispatching anything
    List {
        #[command(flatten)]
        share: ShareArgs,

        /// Also POST the listing JSON to this URL
        #[arg(long)]
        post_url: Option<String>,
    },

    /// Run the full discover, pair and dispatch cycle
    Process {
        #[command(flatten)]
        share: ShareArgs,

        /// Destination API endpoint
        #[arg(long, env = "CERTSWEEP_ENDPOINT")]
        endpoint: String,
    },
}

fn build_lister(args: &ShareArgs) -> Arc<GatewayLister> {
    let share_config = ShareConfig {
        gateway_url: args.gateway_url.clone(),
        share: args.share.clone(),
        username: args.username.clone(),
        password: args.password.clone(),
        domain: args.domain.clone(),
    };

    Arc::new(GatewayLister::new(
        share_config.gateway_url.clone(),
        share_config.share.clone(),
        share_config.qualified_username(),
        share_config.password.clone(),
    ))
}

async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::List { share, post_url } => {
            let threshold = share.since.as_deref().map(parse_threshold).transpose()?;
            let lister = build_lister(&share);

            let records = run_listing(
                lister,
                &share.folder_path,
                threshold,
                share.time_field.into(),
            )
            .await?;

            println!("{}", serde_json::to_string_pretty(&records)?);

            if let Some(url) = post_url {
                let sender = Arc::new(HttpSender::from_env());
                match post_listing(sender, &url, &records).await? {
                    SendResult::Success => {}
                    SendResult::Failure { status } => {
                        error!(?status, url = %url, "failed to POST listing");
                    }
                }
            }
        }
        Commands::Process { share, endpoint } => {
            let threshold = share.since.as_deref().map(parse_threshold).transpose()?;
            let lister = build_lister(&share);
            let sender = Arc::new(HttpSender::from_env());

            let config = SweepConfig {
                folder_path: share.folder_path.clone(),
                threshold,
                time_field: share.time_field.into(),
                endpoint,
            };

            let summary = run_sweep(lister, sender, &config).await?;
            print!("{}", summary);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if present (before anything else)
    let _ = dotenvy::dotenv();

    let default_filter = if is_verbose() {
        "certsweep=info"
    } else {
        "certsweep=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
