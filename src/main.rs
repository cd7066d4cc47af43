use listing_scraper::db::{init_db, Database};
use listing_scraper::scraper::load_sources;
use listing_scraper::{runner, Settings};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "listing_scraper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(e) = run() {
        error!("run failed: {e}");
        std::process::exit(1);
    }
}

fn run() -> listing_scraper::Result<()> {
    // 1. Settings and source definitions
    let settings = Settings::from_env()?;
    let sources = load_sources(&settings.sources_path)?;
    info!(
        sources = sources.len(),
        date = %settings.run_date_label(),
        "starting collection run"
    );

    // 2. Database
    let db = Database::new(settings.db_path.clone());
    init_db(&db)?;

    // 3. Crawl, reconcile, store
    let summary = runner::run(&db, &settings, &sources)?;
    info!(
        new = summary.new,
        old = summary.old,
        deleted = summary.deleted,
        "run complete"
    );
    Ok(())
}
