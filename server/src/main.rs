use clap::Parser;
use tokio::net::TcpListener;
use todo_server::config::Config;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    todo_server::logging::init_tracing();
    let config = Config::parse();

    let service = config.open_service().await?;
    let listener = TcpListener::bind(config.addr()).await?;
    info!(addr = %listener.local_addr()?, database = %config.database, "listening");
    todo_server::run(listener, service).await?;
    Ok(())
}
