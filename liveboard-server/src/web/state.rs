//! Application state for the web layer.

use std::sync::Arc;

use crate::irail::IrailApi;

/// Shared application state.
///
/// Only the API client and configuration are shared; each request builds
/// its own view state.
pub struct AppState<A> {
    /// iRail API client
    pub api: Arc<A>,

    /// Station the liveboard shows when none is given
    pub default_station: Arc<str>,
}

impl<A: IrailApi> AppState<A> {
    /// Create a new app state.
    pub fn new(api: A, default_station: impl Into<String>) -> Self {
        Self {
            api: Arc::new(api),
            default_station: Arc::from(default_station.into()),
        }
    }
}

// Not derived: `A` itself need not be `Clone`.
impl<A> Clone for AppState<A> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            default_station: Arc::clone(&self.default_station),
        }
    }
}
