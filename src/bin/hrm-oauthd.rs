use std::sync::Arc;

use clap::Parser;
use hrm_oauth::http::server::Server;
use hrm_oauth::util::cli::ServerOptions;
use hrm_oauth::Error;

async fn hrm_oauthd(opts: ServerOptions) -> Result<(), Error> {
    let address = opts.address();
    let client = opts.config.into_client()?;

    let server = Server::new(Arc::new(client), address);
    server.serve().await;
    Ok(())
}

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let opts = ServerOptions::parse();
    if let Err(e) = hrm_oauthd(opts).await {
        tracing::error!(error = %e, "Failed to start");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
