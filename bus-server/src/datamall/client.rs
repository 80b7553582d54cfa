//! DataMall HTTP client.
//!
//! Provides async methods for the LTA DataMall API. Handles
//! authentication, pagination, and conversion to domain types.

use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tokio::sync::Semaphore;

use crate::domain::{BusArrival, BusRoute, BusService, BusStop, StopCode};

use super::convert::{convert_arrival, convert_routes, convert_services, convert_stops};
use super::error::DataMallError;
use super::types::{
    BusArrivalResponse, BusRouteRecord, BusServiceRecord, BusStopRecord, ListResponse,
};

/// Default base URL for the DataMall API.
const DEFAULT_BASE_URL: &str = "https://datamall2.mytransport.sg";

/// Default maximum concurrent requests.
const DEFAULT_MAX_CONCURRENT: usize = 5;

/// Configuration for the DataMall client.
#[derive(Debug, Clone)]
pub struct DataMallConfig {
    /// Account key for authentication
    pub account_key: String,
    /// Base URL for the API (defaults to production DataMall)
    pub base_url: String,
    /// Maximum concurrent requests
    pub max_concurrent: usize,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl DataMallConfig {
    /// Create a new config with the given account key.
    pub fn new(account_key: impl Into<String>) -> Self {
        Self {
            account_key: account_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            timeout_secs: 30,
        }
    }

    /// Set a custom base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set maximum concurrent requests.
    pub fn with_max_concurrent(mut self, n: usize) -> Self {
        self.max_concurrent = n;
        self
    }

    /// Set request timeout.
    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// One page of a paginated dataset, after conversion.
///
/// `fetched` is the record count as it came off the wire. Pagination
/// decisions must use it rather than `records.len()`: conversion may
/// drop invalid records, and a thinned page is not an end-of-dataset
/// signal.
#[derive(Debug, Clone)]
pub struct Page<T> {
    /// Converted records that passed validation.
    pub records: Vec<T>,
    /// Wire record count before validation.
    pub fetched: usize,
}

/// DataMall API client.
///
/// Provides paginated access to the bus stop, service, and route
/// datasets plus live arrival lookups. Uses a semaphore to limit
/// concurrent requests and avoid rate limiting.
#[derive(Debug, Clone)]
pub struct DataMallClient {
    http: reqwest::Client,
    base_url: String,
    semaphore: Arc<Semaphore>,
}

impl DataMallClient {
    /// Create a new DataMall client with the given configuration.
    pub fn new(config: DataMallConfig) -> Result<Self, DataMallError> {
        let mut headers = HeaderMap::new();

        // DataMall authenticates with an "AccountKey" header
        let account_key =
            HeaderValue::from_str(&config.account_key).map_err(|_| DataMallError::ApiError {
                status: 0,
                message: "Invalid account key format".to_string(),
            })?;
        headers.insert("AccountKey", account_key);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url,
            semaphore: Arc::new(Semaphore::new(config.max_concurrent)),
        })
    }

    /// Get one page of the bus stop dataset starting at `skip`.
    pub async fn get_bus_stops(&self, skip: u32) -> Result<Page<BusStop>, DataMallError> {
        let page: ListResponse<BusStopRecord> =
            self.fetch_list("/ltaodataservice/BusStops", skip).await?;

        let fetched = page.value.len();
        Ok(Page {
            records: convert_stops(page.value),
            fetched,
        })
    }

    /// Get one page of the bus service dataset starting at `skip`.
    pub async fn get_bus_services(&self, skip: u32) -> Result<Page<BusService>, DataMallError> {
        let page: ListResponse<BusServiceRecord> = self
            .fetch_list("/ltaodataservice/BusServices", skip)
            .await?;

        let fetched = page.value.len();
        Ok(Page {
            records: convert_services(page.value),
            fetched,
        })
    }

    /// Get one page of the bus route dataset starting at `skip`.
    pub async fn get_bus_routes(&self, skip: u32) -> Result<Page<BusRoute>, DataMallError> {
        let page: ListResponse<BusRouteRecord> =
            self.fetch_list("/ltaodataservice/BusRoutes", skip).await?;

        let fetched = page.value.len();
        Ok(Page {
            records: convert_routes(page.value),
            fetched,
        })
    }

    /// Get live arrivals for a stop.
    ///
    /// Pass `service_no` to restrict the response to one service;
    /// otherwise all services calling at the stop are returned.
    pub async fn get_bus_arrival(
        &self,
        code: &StopCode,
        service_no: Option<&str>,
    ) -> Result<BusArrival, DataMallError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DataMallError::ApiError {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}/ltaodataservice/v3/BusArrival", self.base_url);

        let mut query = vec![("BusStopCode", code.as_str().to_string())];
        if let Some(service_no) = service_no {
            query.push(("ServiceNo", service_no.to_string()));
        }

        let response = self.http.get(&url).query(&query).send().await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DataMallError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataMallError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataMallError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        let arrival: BusArrivalResponse =
            serde_json::from_str(&body).map_err(|e| DataMallError::Json {
                message: e.to_string(),
                body: Some(body.chars().take(500).collect()),
            })?;

        convert_arrival(arrival).map_err(|e| DataMallError::Json {
            message: e.to_string(),
            body: None,
        })
    }

    /// Fetch one page of a paginated dataset.
    ///
    /// All three reference datasets share the envelope and the `$skip`
    /// pagination parameter; only the path differs.
    async fn fetch_list<T: DeserializeOwned>(
        &self,
        path: &str,
        skip: u32,
    ) -> Result<ListResponse<T>, DataMallError> {
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|_| DataMallError::ApiError {
                status: 0,
                message: "Semaphore closed".to_string(),
            })?;

        let url = format!("{}{}", self.base_url, path);

        let response = self
            .http
            .get(&url)
            .query(&[("$skip", skip.to_string())])
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::UNAUTHORIZED {
            return Err(DataMallError::Unauthorized);
        }

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(DataMallError::RateLimited);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DataMallError::ApiError {
                status: status.as_u16(),
                message: body,
            });
        }

        let body = response.text().await?;

        serde_json::from_str(&body).map_err(|e| DataMallError::Json {
            message: e.to_string(),
            body: Some(body.chars().take(500).collect()),
        })
    }
}
