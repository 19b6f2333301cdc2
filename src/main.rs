mod config;
mod db;
mod entities;
mod error;
mod models;
mod ranking;
mod routes;
mod service;
mod store;
mod templates;
mod tmdb;

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tower_http::trace::TraceLayer;

use crate::{config::Config, service::MovieService, store::MovieStore, tmdb::TmdbClient};

pub struct AppState {
    pub service: MovieService,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "info,reelrank=debug,sqlx=warn".to_string()),
        )
        .init();

    let config = Arc::new(Config::from_env()?);

    let http = reqwest::Client::builder()
        .user_agent("reelrank/0.1")
        .timeout(Duration::from_secs(30))
        .build()?;

    let db = db::connect_and_migrate(&config.database_url).await?;
    let store = MovieStore::new(db);

    let tmdb = TmdbClient::new(
        http,
        config.tmdb_access_token.clone(),
        config.tmdb_base_url.clone(),
        config.tmdb_rps,
    );

    let service = MovieService::new(store, Arc::new(tmdb), config.tmdb_image_base_url.clone());
    let state = Arc::new(AppState { service });

    let app = Router::new()
        .route("/", get(routes::home))
        .route("/add", get(routes::add_page).post(routes::search))
        .route("/select/{tmdb_id}", get(routes::select))
        .route("/edit/{id}", get(routes::edit_page).post(routes::edit))
        .route("/delete/{id}", get(routes::delete))
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    tracing::info!(addr = %config.addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
