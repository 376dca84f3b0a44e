//! Per-view state for the liveboard and train detail pages.
//!
//! Each view owns its fetch state outright. Nothing here is shared between
//! views or between requests.

mod fetch;
mod liveboard;
mod time;
mod train;

pub use fetch::{Completion, FetchTicket, Phase, RequestTracker, Slot};
pub use liveboard::{BoardFetch, BoardKey, DEFAULT_STATION, LiveboardView, fetch_board};
pub use time::{format_clock, format_local_clock};
pub use train::{TrainFetch, TrainStatus, TrainView, fetch_train, stops_after_station};
