//! API boundary for the crawler.

use async_trait::async_trait;

use crate::datamall::{DataMallClient, DataMallError, Page};
use crate::domain::{BusArrival, BusRoute, BusService, BusStop, StopCode};

/// Trait over the upstream bus data API.
///
/// This abstraction lets the crawler and the serving layer be tested
/// against fake page sequences instead of a live endpoint. `skip` is a
/// record offset; one call returns at most one batch of records.
#[async_trait]
pub trait BusApi: Send + Sync {
    /// Fetch one page of the bus stop dataset.
    async fn get_bus_stops(&self, skip: u32) -> Result<Page<BusStop>, DataMallError>;

    /// Fetch one page of the bus service dataset.
    async fn get_bus_services(&self, skip: u32) -> Result<Page<BusService>, DataMallError>;

    /// Fetch one page of the bus route dataset.
    async fn get_bus_routes(&self, skip: u32) -> Result<Page<BusRoute>, DataMallError>;

    /// Fetch live arrivals for a stop, optionally for one service.
    async fn get_bus_arrival(
        &self,
        code: &StopCode,
        service_no: Option<&str>,
    ) -> Result<BusArrival, DataMallError>;
}

#[async_trait]
impl BusApi for DataMallClient {
    async fn get_bus_stops(&self, skip: u32) -> Result<Page<BusStop>, DataMallError> {
        DataMallClient::get_bus_stops(self, skip).await
    }

    async fn get_bus_services(&self, skip: u32) -> Result<Page<BusService>, DataMallError> {
        DataMallClient::get_bus_services(self, skip).await
    }

    async fn get_bus_routes(&self, skip: u32) -> Result<Page<BusRoute>, DataMallError> {
        DataMallClient::get_bus_routes(self, skip).await
    }

    async fn get_bus_arrival(
        &self,
        code: &StopCode,
        service_no: Option<&str>,
    ) -> Result<BusArrival, DataMallError> {
        DataMallClient::get_bus_arrival(self, code, service_no).await
    }
}
