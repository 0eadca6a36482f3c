use quotecast::{AppConfig, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn print_help() {
    eprintln!(
        r#"Quotecast - live market-quote streaming server

USAGE:
    quotecast [OPTIONS]

OPTIONS:
    --config <PATH>     Load configuration from JSON file
    --help              Print this help message

ENVIRONMENT VARIABLES:
    HOST                Server host (default: 0.0.0.0)
    PORT                Server port (default: 3001)
    RUST_LOG            Log level filter

EXAMPLES:
    # Run with defaults
    quotecast

    # Run with config file
    quotecast --config config.json

    # Run with custom port
    PORT=9000 quotecast
"#
    );
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "quotecast=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            "--config" | "-c" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --config requires a path argument");
                    std::process::exit(1);
                }
                config_path = Some(args[i].clone());
            }
            arg => {
                eprintln!("Unknown argument: {}", arg);
                print_help();
                std::process::exit(1);
            }
        }
        i += 1;
    }

    let mut config = if let Some(path) = config_path {
        tracing::info!("loading configuration from: {}", path);
        AppConfig::from_file(&path)?
    } else {
        AppConfig::default()
    };

    // Environment overrides
    if let Ok(host) = std::env::var("HOST") {
        config.server.host = host;
    }
    if let Ok(port) = std::env::var("PORT") {
        config.server.port = port.parse().unwrap_or(config.server.port);
    }

    let server = Server::new(config);

    tracing::info!("starting quotecast");
    tracing::info!(
        "stock API: http://{}:{}/api/stocks",
        server.config.server.host,
        server.config.server.port
    );
    tracing::info!(
        "websocket: ws://{}:{}/ws",
        server.config.server.host,
        server.config.server.port
    );
    tracing::info!("available endpoints:");
    tracing::info!("  GET /api/stocks?exchange=NSE&symbols=TCS,INFY&limit=20");
    tracing::info!("  GET /api/stocks/search?query=bank");
    tracing::info!("  GET /api/stocks/{{symbol}}?exchange=NSE");
    tracing::info!("  GET /health");

    server.run().await
}
