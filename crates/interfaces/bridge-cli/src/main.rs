use anyhow::Context;
use bridge_cli::{Command, Flow, Session};
use bridge_infra::{HttpProtocolClient, ProtocolConfig};
use clap::Parser;
use reqwest::Url;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Terminal browser for bridge applications.
#[derive(Parser)]
#[command(author, version, about)]
struct Cli {
    #[arg(short, long)]
    verbose: bool,
    /// Origin the application is served from
    #[arg(long, env = "BRIDGE_BASE_URL")]
    base_url: String,
    /// Marker sent in X-Requested-With
    #[arg(long, env = "BRIDGE_APP_MARKER", default_value = bridge_config::DEFAULT_APP_MARKER)]
    marker: String,
    /// Page to open first
    #[arg(long, default_value = "/")]
    path: String,
    /// Global context provider to show, in wrapping order (repeatable)
    #[arg(long = "context", value_name = "NAME")]
    contexts: Vec<String>,
}

fn setup_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    let base_url = Url::parse(&cli.base_url)
        .with_context(|| format!("invalid base url {}", cli.base_url))?;
    let http = reqwest::Client::builder()
        .build()
        .context("Failed to build HTTP client")?;
    let client =
        HttpProtocolClient::new(http, ProtocolConfig::new(base_url).with_marker(cli.marker));

    let mut session = Session::open(client, &cli.path, cli.contexts).await?;
    println!(":: Type `help` for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let cmd = match Command::parse(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("{e:#}");
                continue;
            }
        };
        match session.execute(cmd).await {
            Ok(Flow::Quit) => break,
            Ok(Flow::Continue) => {}
            Err(e) => eprintln!("error: {e:#}"),
        }
    }

    Ok(())
}
