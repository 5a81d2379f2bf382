use clap::Parser;
use socksd::{Config, Server};
use std::error::Error;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// start as server
    #[arg(short, long)]
    server: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    if args.server {
        info!("Server mode");
        let server = Server::bind(&Config::default()).await?;
        server.run().await;
    } else {
        info!("Client mode: nothing to do");
    }
    Ok(())
}
