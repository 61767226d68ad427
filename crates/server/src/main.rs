//! docintake server binary
//!
//! Loads `.env`, then configuration from `docintake.*` and `DOCINTAKE__*`
//! variables, and serves the API until shutdown.

use server::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = ServerConfig::load()?;

    server::start_server(config).await?;

    Ok(())
}
