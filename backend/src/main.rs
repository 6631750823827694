use actix_web::web::Data;
use anyhow::Result;
use common::Classifier;
use log::info;

mod api;
mod config;
mod db;
mod feed;
mod schema;
mod utils;

#[actix_web::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = config::Config::from_env()?;
    let db = db::Db::connect(&config.database_url)?;
    let state = Data::new(api::AppState::new(db, Classifier::default()));

    info!(
        "Listening on http://{}:{} (frontend {})",
        config.bind_addr, config.port, config.frontend_origin
    );
    api::new_http_server(state, &config).await?;

    Ok(())
}
