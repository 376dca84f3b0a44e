//! Train detail view state.
//!
//! Keyed on the train id. Vehicle info and composition are fetched as two
//! independent requests; each lands in its own slot, and the view is ready
//! only when both have succeeded.

use tracing::{debug, warn};

use crate::irail::{IrailApi, IrailError, Segment, Stop, TrainComposition, TrainInfo};

use super::fetch::{Completion, FetchTicket, RequestTracker, Slot};

/// Stops strictly after the first stop named `station`.
///
/// Empty when `station` is absent or no stop carries that name.
pub fn stops_after_station<'a>(stops: &'a [Stop], station: Option<&str>) -> &'a [Stop] {
    let Some(station) = station else {
        return &[];
    };
    match stops.iter().position(|s| s.station_name() == Some(station)) {
        Some(idx) => &stops[idx + 1..],
        None => &[],
    }
}

/// Both requests of a train fetch, finished.
#[derive(Debug)]
pub struct TrainFetch {
    pub ticket: FetchTicket<String>,
    pub info: Result<TrainInfo, IrailError>,
    pub composition: Result<TrainComposition, IrailError>,
}

/// Run both requests for `ticket` concurrently.
pub async fn fetch_train<A: IrailApi>(api: &A, ticket: FetchTicket<String>) -> TrainFetch {
    let id = ticket.key();
    let (info, composition) = futures::future::join(api.vehicle(id), api.composition(id)).await;
    TrainFetch {
        ticket,
        info,
        composition,
    }
}

/// Overall state of the detail view.
#[derive(Debug, Clone, Copy)]
pub enum TrainStatus<'a> {
    Loading,
    Failed,
    Ready {
        info: &'a TrainInfo,
        composition: &'a TrainComposition,
    },
}

#[derive(Debug, Clone)]
pub struct TrainView {
    station: Option<String>,
    tracker: RequestTracker<String>,
    info: Slot<TrainInfo>,
    composition: Slot<TrainComposition>,
}

impl TrainView {
    pub fn new(train_id: impl Into<String>, station: Option<String>) -> Self {
        Self {
            station,
            tracker: RequestTracker::new(train_id.into()),
            info: Slot::default(),
            composition: Slot::default(),
        }
    }

    pub fn train_id(&self) -> &str {
        self.tracker.key()
    }

    pub fn station(&self) -> Option<&str> {
        self.station.as_deref()
    }

    /// Start fetching both endpoints.
    pub fn mount(&mut self) -> FetchTicket<String> {
        self.info.begin();
        self.composition.begin();
        self.tracker.issue()
    }

    /// Follow a new path. Only a changed train id triggers a fetch; the
    /// station just changes which stops are shown.
    pub fn navigate(
        &mut self,
        train_id: impl Into<String>,
        station: Option<String>,
    ) -> Option<FetchTicket<String>> {
        self.station = station;
        if self.tracker.set_key(train_id.into()) {
            Some(self.mount())
        } else {
            None
        }
    }

    /// Apply the vehicle-info half of a fetch. Returns whether it was applied.
    pub fn complete_info(
        &mut self,
        ticket: &FetchTicket<String>,
        outcome: Result<TrainInfo, IrailError>,
    ) -> bool {
        let done = self.info.complete(&self.tracker, ticket, outcome);
        log_completion(ticket, "vehicle", done)
    }

    /// Apply the composition half of a fetch. Returns whether it was applied.
    pub fn complete_composition(
        &mut self,
        ticket: &FetchTicket<String>,
        outcome: Result<TrainComposition, IrailError>,
    ) -> bool {
        let done = self.composition.complete(&self.tracker, ticket, outcome);
        log_completion(ticket, "composition", done)
    }

    /// Apply both halves of a fetch.
    pub fn complete(&mut self, fetch: TrainFetch) {
        let TrainFetch {
            ticket,
            info,
            composition,
        } = fetch;
        self.complete_info(&ticket, info);
        self.complete_composition(&ticket, composition);
    }

    /// Failed as soon as either half failed; ready once both succeeded.
    pub fn status(&self) -> TrainStatus<'_> {
        let (info, composition) = (self.info.phase(), self.composition.phase());
        if info.is_failed() || composition.is_failed() {
            return TrainStatus::Failed;
        }
        match (info.ready(), composition.ready()) {
            (Some(info), Some(composition)) => TrainStatus::Ready { info, composition },
            _ => TrainStatus::Loading,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.status(), TrainStatus::Loading)
    }

    /// Stops after the path's station, once the vehicle info is in.
    pub fn upcoming_stops(&self) -> &[Stop] {
        match self.info.phase().ready() {
            Some(info) => stops_after_station(info.stops(), self.station()),
            None => &[],
        }
    }

    /// Composition segments, once the composition is in.
    pub fn segments(&self) -> &[Segment] {
        match self.composition.phase().ready() {
            Some(composition) => composition.segments(),
            None => &[],
        }
    }

    /// Fetch both endpoints for the current train and apply them.
    pub async fn load<A: IrailApi>(&mut self, api: &A) {
        let ticket = self.mount();
        let fetch = fetch_train(api, ticket).await;
        self.complete(fetch);
    }
}

fn log_completion(
    ticket: &FetchTicket<String>,
    endpoint: &str,
    done: Completion<IrailError>,
) -> bool {
    match done {
        Completion::Applied => true,
        Completion::Failed(e) => {
            warn!(train = %ticket.key(), endpoint, error = %e, "failed to load train data");
            true
        }
        Completion::Stale => {
            debug!(
                train = %ticket.key(),
                endpoint,
                seq = ticket.seq(),
                "discarding stale train response"
            );
            false
        }
    }
}
