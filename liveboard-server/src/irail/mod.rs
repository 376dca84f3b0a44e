//! iRail API client.
//!
//! This module provides an HTTP client for the public iRail API, which
//! exposes live Belgian railway data.
//!
//! Key characteristics of iRail:
//! - Scalars are sent as strings (`"time": "1700000000"`, `"delay": "0"`)
//! - Times are Unix timestamps in seconds
//! - Lists are wrapped in an object with a `number` field, e.g.
//!   `departures.departure[]` or `stops.stop[]`
//! - Any field may be missing

mod client;
mod error;
mod mock;
mod types;

pub use client::{DEFAULT_BASE_URL, DEFAULT_LANG, IrailApi, IrailClient, IrailConfig};
pub use error::{BoxError, IrailError};
pub use mock::MockIrailClient;
pub use types::{
    Arrival, BoardEntry, Departure, Direction, LiveboardResponse, LiveboardResult, Segment,
    StationInfo, Stop, TrainComposition, TrainInfo, Unit, VehicleInfo, flag_is_set,
};
