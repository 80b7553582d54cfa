use std::net::SocketAddr;
use std::sync::Arc;

use futures::FutureExt;
use tracing::{error, info, warn};

use bus_server::config::AppConfig;
use bus_server::crawler::{BusApi, Crawler};
use bus_server::datamall::{DataMallClient, DataMallConfig};
use bus_server::scheduler::Scheduler;
use bus_server::store::MemoryStore;
use bus_server::web::{AppState, create_router};

/// Id of the periodic dataset sync task.
const SYNC_TASK: &str = "lta-crawler";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bus_server=info".into()),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let mut datamall = DataMallConfig::new(&config.account_key);
    if let Some(base_url) = &config.base_url {
        datamall = datamall.with_base_url(base_url);
    }
    let client = DataMallClient::new(datamall).expect("Failed to create DataMall client");

    let api: Arc<dyn BusApi> = Arc::new(client);
    let store = MemoryStore::new();
    let crawler = Arc::new(Crawler::new(api.clone(), Arc::new(store.clone())));

    let scheduler = Arc::new(Scheduler::new());
    let sync_crawler = crawler.clone();
    scheduler.add_task(SYNC_TASK, config.sync_interval, move |cancel| {
        let crawler = sync_crawler.clone();
        async move {
            let report = crawler.crawl_all(&cancel).await;
            if report.all_succeeded() {
                info!("dataset sync completed");
            } else {
                warn!("dataset sync finished with errors");
            }
        }
        .boxed()
    });

    scheduler
        .enable_task(SYNC_TASK)
        .expect("freshly registered task can be enabled");

    // the first periodic run is a full interval away; sync once now so
    // the store does not serve empty datasets until then
    if let Err(e) = scheduler.trigger_task(SYNC_TASK) {
        warn!("initial sync not started: {e}");
    }

    let state = AppState::new(scheduler, store, api);
    let app = create_router(state, &config.static_dir);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(
        %addr,
        sync_interval_secs = config.sync_interval.as_secs(),
        "bus data server listening"
    );

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind server address");
    axum::serve(listener, app).await.expect("Server error");
}
