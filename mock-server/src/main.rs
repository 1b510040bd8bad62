use mock_server::Fixture;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let fixture = match std::env::var("FIXTURE") {
        Ok(path) => {
            let raw = std::fs::read_to_string(&path)?;
            Fixture::from_json(&raw).map_err(std::io::Error::other)?
        }
        Err(_) => Fixture::sample(),
    };

    let port = std::env::var("PORT").unwrap_or_else(|_| "9410".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {addr}");
    mock_server::run(listener, fixture).await
}
