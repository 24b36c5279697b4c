use clap::Parser;

#[tokio::main]
async fn main() {
    use hrm_oauth::util::cli::*;

    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let opts = Options::parse();
    if let Err(e) = run_cli_action(opts).await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
