use std::path::Path;

use cwl_server::{CwlServer, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let config = match std::env::var("CWL_CONFIG") {
        Ok(path) => ServerConfig::load(Path::new(&path))?,
        Err(_) => ServerConfig::default(),
    };

    CwlServer::new(config).serve().await?;
    Ok(())
}
