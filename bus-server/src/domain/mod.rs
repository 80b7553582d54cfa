//! Domain types for the bus data service.
//!
//! This module contains the core domain model types that represent
//! validated bus data. All types enforce their invariants at construction
//! time, so code that receives these types can trust their validity.

mod arrival;
mod route;
mod service;
mod stop;

pub use arrival::{ArrivingService, BusArrival, BusType, Load, NextBus};
pub use route::BusRoute;
pub use service::{BusService, FrequencyRange};
pub use stop::{BusStop, InvalidStopCode, StopCode};
