mod config;
mod handlers;
mod meta_client;
mod models;


use actix_web::{web, App, HttpServer};
use dotenvy::dotenv;
use std::env;
use tracing_subscriber::FmtSubscriber;

use crate::config::RelayConfig;
use crate::meta_client::MetaClient;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();

    // tracing
    let subscriber = FmtSubscriber::builder().with_env_filter("info").finish();
    tracing::subscriber::set_global_default(subscriber).expect("tracing subscriber");

    let config = RelayConfig::from_env();
    if config.access_token.is_none() {
        tracing::warn!("META_ACCESS_TOKEN not set — relay requests will fail with 500");
    }
    let port = env::var("SERVICE_PORT").unwrap_or_else(|_| "3001".into()); // default 3001

    let client = web::Data::new(MetaClient::new(config));

    tracing::info!("Meta CAPI relay running on localhost:{}", port);

    HttpServer::new(move || {
        App::new()
            .app_data(client.clone())
            .service(handlers::health)
            // all methods land in the handler so it can answer 405 itself
            .route("/api/meta-capi", web::route().to(handlers::relay_event))
    })
    .bind(format!("0.0.0.0:{}", port))?
    .run()
    .await
}
