//! Bus data sync server.
//!
//! Periodically pulls Singapore's bus reference datasets (stops,
//! services, routes) from LTA DataMall, normalizes the quirks of the
//! feed, and serves the result plus live arrival lookups over HTTP.

pub mod config;
pub mod crawler;
pub mod datamall;
pub mod domain;
pub mod scheduler;
pub mod store;
pub mod web;
