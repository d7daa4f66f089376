use std::sync::Arc;

use clap::Parser;
use tracing::error;

use somo::banner::{BannerInfo, print_banner};
use somo::config::Args;
use somo::curriculum::Curriculum;
use somo::gateway::gemini::GeminiGateway;
use somo::logging;
use somo::relay::Relay;
use somo::server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenv::dotenv().ok();
    logging::init()?;

    // Missing credentials stop the process here, before anything is bound.
    let config = Args::parse()
        .into_config()
        .await
        .inspect_err(|e| error!("{}", e))?;

    let gateway = GeminiGateway::new(config.api_key.clone(), Some(config.model.clone()))
        .with_api_base(config.api_base.clone());
    let curriculum = Arc::new(Curriculum::kenyan_cbc());

    print_banner(&BannerInfo {
        listen: config.listen,
        model: &config.model,
        curriculum: curriculum.name,
        grades: curriculum.grades().len(),
        rate_limit: config.rate_limit,
        cors_origin: config.cors_origin.as_deref(),
    });

    let relay = Arc::new(Relay::new(curriculum, Arc::new(gateway)));
    server::run(&config, relay).await?;

    println!("goodbye.");
    Ok(())
}
