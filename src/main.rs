use std::sync::Arc;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod catalog;
mod config;
mod models;
mod render;
mod search_input;
mod sources;
mod traits;

use catalog::{CatalogController, CatalogState};
use config::AppConfig;
use render::ListView;
use search_input::SearchInput;
use sources::DummyJsonSource;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    // Logs go to stderr so they stay out of the product listing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = AppConfig::from_env()?;
    info!("Starting catalog browser against {}", config.api_base_url);

    let source = Arc::new(DummyJsonSource::new(&config)?);
    let catalog = CatalogController::new(source, &config);

    let renderer = tokio::spawn(render_loop(catalog.subscribe()));

    let search = SearchInput::new({
        let catalog = catalog.clone();
        move |text| catalog.handle_search(text)
    });

    // First page in browse mode
    spawn_load_more(&catalog);

    println!(
        "{} (type to search, empty line to clear, :more for more, :quit to exit)",
        search.placeholder()
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match line.trim() {
            ":q" | ":quit" => break,
            ":m" | ":more" => spawn_load_more(&catalog),
            _ => search.change(&line),
        }
    }

    renderer.abort();
    info!(
        "Catalog browser stopped with {} products loaded",
        catalog.state().items.len()
    );
    Ok(())
}

fn spawn_load_more(catalog: &CatalogController) {
    let catalog = catalog.clone();
    tokio::spawn(async move {
        catalog.load_more().await;
    });
}

async fn render_loop(mut state: watch::Receiver<CatalogState>) {
    let mut view = ListView::new();

    loop {
        let lines = view.update(&state.borrow_and_update());
        for line in lines {
            println!("{line}");
        }

        if state.changed().await.is_err() {
            break;
        }
    }
}
