//! Web layer for the bus data server.
//!
//! Serves the dashboard, the scheduler control endpoints, and the JSON
//! API over the stored datasets and live arrivals.

mod dto;
mod routes;
mod state;
pub mod templates;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;
pub use templates::*;
