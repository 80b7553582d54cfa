//! Paginated dataset crawler.
//!
//! Each crawl walks one reference dataset from offset 0 in batches of
//! [`BATCH_SIZE`], saving every fetched page to the store. A crawl
//! stops on the first empty page, on the first short page (the dataset
//! is exhausted), on any fetch or save error, or when its cancellation
//! token fires. Cancellation is advisory and checked before each
//! fetch, so an in-flight request is never interrupted mid-page.

use std::sync::Arc;
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::store::Datastore;

use super::api::BusApi;
use super::error::CrawlError;

/// Maximum records per page, and the offset stride between pages.
pub const BATCH_SIZE: u32 = 500;

/// Outcome of one successful crawl.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CrawlSummary {
    /// Non-empty pages fetched
    pub pages: u32,
    /// Records stored after validation
    pub records: usize,
}

/// Per-kind outcomes of a full dataset sync.
///
/// A failed kind does not stop the kinds after it, so each field
/// carries its own result.
#[derive(Debug)]
pub struct CrawlReport {
    /// Outcome of the bus stop crawl
    pub stops: Result<CrawlSummary, CrawlError>,
    /// Outcome of the bus service crawl
    pub services: Result<CrawlSummary, CrawlError>,
    /// Outcome of the bus route crawl
    pub routes: Result<CrawlSummary, CrawlError>,
}

impl CrawlReport {
    /// True when every kind crawled without error.
    pub fn all_succeeded(&self) -> bool {
        self.stops.is_ok() && self.services.is_ok() && self.routes.is_ok()
    }
}

/// Walks the paginated DataMall datasets and writes them to the store.
#[derive(Clone)]
pub struct Crawler {
    api: Arc<dyn BusApi>,
    store: Arc<dyn Datastore>,
}

impl Crawler {
    /// Create a crawler over the given API and store.
    pub fn new(api: Arc<dyn BusApi>, store: Arc<dyn Datastore>) -> Self {
        Self { api, store }
    }

    /// Crawl the bus stop dataset.
    pub async fn crawl_bus_stops(
        &self,
        cancel: &CancellationToken,
    ) -> Result<CrawlSummary, CrawlError> {
        let mut summary = CrawlSummary::default();
        let mut skip = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Err(CrawlError::Cancelled);
            }

            let page = self.api.get_bus_stops(skip).await?;
            if page.fetched == 0 {
                break;
            }

            debug!(skip, fetched = page.fetched, "bus stop page fetched");

            summary.pages += 1;
            summary.records += page.records.len();

            if !page.records.is_empty() {
                self.store.save_bus_stops(page.records).await?;
            }

            if page.fetched < BATCH_SIZE as usize {
                break;
            }
            skip += BATCH_SIZE;
        }

        Ok(summary)
    }

    /// Crawl the bus service dataset.
    pub async fn crawl_bus_services(
        &self,
        cancel: &CancellationToken,
    ) -> Result<CrawlSummary, CrawlError> {
        let mut summary = CrawlSummary::default();
        let mut skip = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Err(CrawlError::Cancelled);
            }

            let page = self.api.get_bus_services(skip).await?;
            if page.fetched == 0 {
                break;
            }

            debug!(skip, fetched = page.fetched, "bus service page fetched");

            summary.pages += 1;
            summary.records += page.records.len();

            if !page.records.is_empty() {
                self.store.save_bus_services(page.records).await?;
            }

            if page.fetched < BATCH_SIZE as usize {
                break;
            }
            skip += BATCH_SIZE;
        }

        Ok(summary)
    }

    /// Crawl the bus route dataset.
    pub async fn crawl_bus_routes(
        &self,
        cancel: &CancellationToken,
    ) -> Result<CrawlSummary, CrawlError> {
        let mut summary = CrawlSummary::default();
        let mut skip = 0u32;

        loop {
            if cancel.is_cancelled() {
                return Err(CrawlError::Cancelled);
            }

            let page = self.api.get_bus_routes(skip).await?;
            if page.fetched == 0 {
                break;
            }

            debug!(skip, fetched = page.fetched, "bus route page fetched");

            summary.pages += 1;
            summary.records += page.records.len();

            if !page.records.is_empty() {
                self.store.save_bus_routes(page.records).await?;
            }

            if page.fetched < BATCH_SIZE as usize {
                break;
            }
            skip += BATCH_SIZE;
        }

        Ok(summary)
    }

    /// Crawl all three datasets in sequence.
    ///
    /// A failure in one dataset is logged and the remaining datasets
    /// are still crawled; the report records each outcome.
    pub async fn crawl_all(&self, cancel: &CancellationToken) -> CrawlReport {
        info!("dataset sync started");

        let stops = run_logged("bus_stops", self.crawl_bus_stops(cancel)).await;
        let services = run_logged("bus_services", self.crawl_bus_services(cancel)).await;
        let routes = run_logged("bus_routes", self.crawl_bus_routes(cancel)).await;

        CrawlReport {
            stops,
            services,
            routes,
        }
    }
}

/// Await one crawl and log its outcome under the given dataset name.
async fn run_logged(
    kind: &'static str,
    crawl: impl Future<Output = Result<CrawlSummary, CrawlError>>,
) -> Result<CrawlSummary, CrawlError> {
    let started = Instant::now();

    match crawl.await {
        Ok(summary) => {
            info!(
                kind,
                pages = summary.pages,
                records = summary.records,
                elapsed_ms = started.elapsed().as_millis() as u64,
                "crawl finished"
            );
            Ok(summary)
        }
        Err(e) => {
            warn!(kind, error = %e, "crawl failed");
            Err(e)
        }
    }
}
