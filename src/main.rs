use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;
use trend_scout::{
    Config, HttpIpEcho, IpEcho, ProxyChecker, ProxyEndpoint, ProxyResolver, ProxySource,
};

/// Free proxy discovery for trending topics capture
#[derive(Parser)]
#[command(name = "trend-scout")]
#[command(about = "Find a working free HTTPS proxy for trending topics capture")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Proxy listing page URL
    #[arg(long, global = true)]
    list_url: Option<String>,

    /// URL requested through each candidate
    #[arg(long, global = true)]
    echo_url: Option<String>,

    /// Timeout per probe in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Overall budget for proxy selection in seconds
    #[arg(long, global = true)]
    deadline: Option<u64>,

    /// Read settings from this env file instead of `.env`
    #[arg(long, global = true)]
    env_file: Option<PathBuf>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    log_json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List HTTPS capable proxies from the listing page
    Fetch,
    /// Fetch the listing and select the first working proxy
    Resolve,
    /// Select the first working proxy among the given endpoints
    Probe {
        /// Endpoints in IP:PORT format, probed in order
        #[arg(required = true)]
        endpoints: Vec<ProxyEndpoint>,
    },
    /// Print the apparent public IP address
    Ip {
        /// Look the address up through this proxy
        #[arg(short, long)]
        proxy: Option<ProxyEndpoint>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    let mut config = match &cli.env_file {
        Some(path) => Config::from_env_file(path)?,
        None => {
            dotenvy::dotenv().ok();
            Config::from_env()?
        }
    };
    if let Some(url) = cli.list_url {
        config.source = config.source.with_url(url);
    }
    if let Some(url) = cli.echo_url {
        config.probe = config.probe.with_echo_url(url);
    }
    if let Some(secs) = cli.timeout {
        config.probe = config.probe.with_timeout(Duration::from_secs(secs));
    }
    if let Some(secs) = cli.deadline {
        config.probe = config.probe.with_deadline(Duration::from_secs(secs));
    }

    match cli.command {
        Commands::Fetch => {
            let source = ProxySource::with_config(config.source)?;
            let proxies = source.fetch_https_proxies().await?;

            if proxies.is_empty() {
                println!("No HTTPS proxies listed.");
            }
            for proxy in &proxies {
                println!("{}", proxy);
            }
        }
        Commands::Resolve => {
            let resolver = ProxyResolver::from_config(&config)?;
            print_selected(resolver.resolve().await);
        }
        Commands::Probe { endpoints } => {
            let checker = ProxyChecker::with_config(config.probe)?;
            print_selected(checker.select_working_proxy(endpoints).await);
        }
        Commands::Ip { proxy } => {
            let echo: HttpIpEcho = config.ip_echo();
            println!("{}", echo.current_ip(proxy.as_ref()).await?);
        }
    }

    Ok(())
}

fn print_selected(selected: Option<ProxyEndpoint>) {
    match selected {
        Some(proxy) => println!("{}", proxy),
        None => println!("No working proxy"),
    }
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "trend_scout=info".into());

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .init();
    }
}
