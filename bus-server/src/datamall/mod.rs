//! LTA DataMall client.
//!
//! This module provides an HTTP client for Singapore's LTA DataMall,
//! which publishes the bus stop, service, and route reference datasets
//! plus live arrival predictions.
//!
//! Key characteristics of DataMall:
//! - The reference datasets are paginated with `$skip` in steps of up
//!   to 500 records; an empty page marks the end of a dataset
//! - Times of day are "HHMM" strings with no separator
//! - Missing values arrive as empty strings or "-", never as null
//! - Arrival predictions carry an RFC 3339 timestamp with a `+08:00`
//!   offset, or an empty string when there is no prediction

mod client;
mod convert;
mod error;
mod types;

pub use client::{DataMallClient, DataMallConfig, Page};
pub use convert::{
    ConversionError, convert_arrival, convert_routes, convert_services, convert_stops, parse_hhmm,
};
pub use error::DataMallError;
pub use types::{
    ArrivingServiceRecord, BusArrivalResponse, BusRouteRecord, BusServiceRecord, BusStopRecord,
    ListResponse, NextBusRecord,
};
