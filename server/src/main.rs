use std::sync::Arc;

use anyhow::Context;
use pokescout_core::PokeApi;
use pokescout_server::{app, logging::setup_tracing, AppState, Config, PokemonService, SqliteRepository};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_tracing();

    let config = Config::load().context("loading configuration")?;
    let repository = SqliteRepository::open(&config.database_url)
        .with_context(|| format!("opening store {}", config.database_url))?;
    let source = PokeApi::with_timeout(&config.pokeapi_base_url, config.fetch_timeout());
    let service = PokemonService::new(Arc::new(repository), Arc::new(source));

    if config.sync_on_startup {
        let startup = service.clone();
        let names = config.pokemon_list.clone();
        tokio::task::spawn_blocking(move || startup.sync(&names))
            .await
            .context("startup sync")?;
    }

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!(%addr, upstream = %config.pokeapi_base_url, "listening");

    axum::serve(listener, app(AppState::new(service, config.pokemon_list))).await?;
    Ok(())
}
