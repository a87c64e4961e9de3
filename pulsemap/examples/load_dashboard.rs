//! Loads the dashboard data and prints the feed.
//!
//! The store is configured by `PULSEMAP_URL` and `PULSEMAP_KEY` environment variables. Without
//! them the example runs against an unreachable address and shows the static dataset.
//!
//! ```sh
//! RUST_LOG=info cargo run --example load_dashboard -- cholera
//! ```

use chrono::Utc;
use pulsemap::layer::MapLayer;
use pulsemap::search::relative_time;
use pulsemap::source::{DataSourceResolver, RemoteSourceConfig, RestSource};
use pulsemap::{Dashboard, DummyMessenger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let url = std::env::var("PULSEMAP_URL").unwrap_or_else(|_| "http://127.0.0.1:9".to_string());
    let key = std::env::var("PULSEMAP_KEY").unwrap_or_default();
    let query = std::env::args().nth(1).unwrap_or_default();

    let source = RestSource::new(RemoteSourceConfig::new(url, key))?;
    let resolver = DataSourceResolver::with_bundled_fallback(source)?;

    let mut dashboard = Dashboard::default();
    dashboard.set_messenger(Some(DummyMessenger));
    dashboard.load(&resolver).await;

    println!(
        "[{}] {} outbreak locations",
        dashboard.status().label(),
        dashboard.features().len()
    );
    for (layer, entry) in dashboard.layers().iter() {
        let state = if entry.visible { "on" } else { "off" };
        let note = if entry.interactive { "" } else { " (coming soon)" };
        println!("  {:<12} {state}{note}", layer.label());
    }

    dashboard.set_search_query(query);
    let now = Utc::now();
    for item in dashboard.visible_feed() {
        println!(
            "{:>10}  {} | {} | {}",
            relative_time(item.published_at, now),
            item.disease_name,
            item.location,
            item.title
        );
    }

    let Some(outbreak_id) = dashboard
        .visible_feed()
        .first()
        .map(|item| item.outbreak_id.clone())
    else {
        return Ok(());
    };

    if dashboard.select_feed_item(&outbreak_id).is_some() {
        if let Some(detail) = dashboard.detail() {
            println!(
                "\n{} in {}: {} cases, severity {} ({}), {}",
                detail.disease_name,
                detail.location,
                detail.cases,
                detail.severity,
                detail.severity_score,
                detail.status
            );
        }
    }

    dashboard.toggle_layer(MapLayer::Hotspots);
    println!("Markers with hotspots hidden: {}", dashboard.markers().len());

    Ok(())
}
