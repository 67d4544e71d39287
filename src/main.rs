use clap::{Args as ClapArgs, Parser, Subcommand};
use morphmatch_api::{MatchService, RestApi};
use morphmatch_core::SemanticProfile;
use morphmatch_similarity::{Matcher, MatcherConfig};
use morphmatch_storage::JsonFileCatalog;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Body-scan archetype matching engine
#[derive(Parser, Debug)]
#[command(name = "morphmatch")]
#[command(about = "Match body-shape profiles against an archetype catalog", long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Log level
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the REST API
    Serve {
        #[command(flatten)]
        matcher: MatcherArgs,

        /// HTTP API port
        #[arg(long, default_value_t = 8080)]
        http_port: u16,

        /// Catalog fetch timeout in milliseconds
        #[arg(long, default_value_t = 2000)]
        fetch_timeout_ms: u64,
    },
    /// Match a single profile file and print the selection as JSON
    Match {
        #[command(flatten)]
        matcher: MatcherArgs,

        /// Path to a JSON semantic profile
        #[arg(short, long)]
        profile: PathBuf,

        /// Number of archetypes to return
        #[arg(short, long)]
        limit: Option<usize>,
    },
}

#[derive(ClapArgs, Debug)]
struct MatcherArgs {
    /// Path to the JSON archetype catalog
    #[arg(short, long, default_value = "./data/archetypes.json")]
    catalog: PathBuf,

    /// BMI tolerance applied on both range bounds
    #[arg(long, default_value_t = morphmatch_core::DEFAULT_BMI_EPSILON)]
    epsilon: f64,

    /// BMI range widening for the relaxed pass
    #[arg(long, default_value_t = morphmatch_core::DEFAULT_BMI_RELAXATION)]
    relaxation: f64,
}

impl MatcherArgs {
    fn build(&self) -> anyhow::Result<(Arc<JsonFileCatalog>, Matcher)> {
        let catalog = Arc::new(JsonFileCatalog::open(&self.catalog)?);
        let config = MatcherConfig::default()
            .with_epsilon(self.epsilon)
            .with_relaxation(self.relaxation);
        Ok((catalog, Matcher::new(config)?))
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_level = match args.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match args.command {
        Command::Serve {
            matcher,
            http_port,
            fetch_timeout_ms,
        } => {
            info!("Starting morphmatch v{}", env!("CARGO_PKG_VERSION"));
            let (catalog, engine) = matcher.build()?;
            info!("Catalog: {:?} ({} archetypes)", matcher.catalog, catalog.len());

            let service = Arc::new(
                MatchService::new(catalog, engine)
                    .with_fetch_timeout(Duration::from_millis(fetch_timeout_ms)),
            );

            let http_handle = std::thread::spawn(move || {
                info!("Starting HTTP server on port {}", http_port);
                let sys = actix_web::rt::System::new();
                sys.block_on(async {
                    if let Err(e) = RestApi::start(service, http_port).await {
                        tracing::error!("HTTP server error: {}", e);
                    }
                })
            });

            info!("HTTP API: http://localhost:{}/", http_port);

            tokio::select! {
                _ = tokio::signal::ctrl_c() => {
                    info!("Shutdown signal received");
                }
                _ = tokio::task::spawn_blocking(move || {
                    http_handle.join().ok();
                }) => {
                    info!("HTTP server stopped");
                }
            }

            info!("Shutting down...");
        }
        Command::Match {
            matcher,
            profile,
            limit,
        } => {
            let (catalog, engine) = matcher.build()?;
            let profile: SemanticProfile = serde_json::from_slice(&std::fs::read(&profile)?)?;

            let result = engine.match_archetypes(catalog.as_ref(), &profile, limit)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
