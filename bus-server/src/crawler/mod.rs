//! Dataset sync engine.
//!
//! The crawler pulls the three DataMall reference datasets (stops,
//! services, routes) page by page and writes them to the store. It is
//! the work behind the periodic sync task; the scheduler hands it a
//! cancellation token and the crawler checks it between pages.

mod api;
mod engine;
mod error;

pub use api::BusApi;
pub use engine::{BATCH_SIZE, CrawlReport, CrawlSummary, Crawler};
pub use error::CrawlError;
