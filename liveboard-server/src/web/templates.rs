//! Askama templates for the two pages, and the view models they render.

use std::fmt;

use askama::Template;
use chrono::TimeZone;
use serde::Serialize;

use crate::irail::{BoardEntry, Direction, Segment, StationInfo, Stop, Unit};
use crate::view::{LiveboardView, Phase, TrainStatus, TrainView, format_clock};

/// Shown in place of content whenever a fetch failed.
pub const FAILED_MESSAGE: &str = "Failed to load data";

/// Shown for a timestamp that is missing or not a number.
const NO_TIME: &str = "--:--";

fn clock<Tz>(timestamp: Option<&str>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    timestamp
        .and_then(|t| format_clock(t, tz))
        .unwrap_or_else(|| NO_TIME.to_string())
}

/// Path of the detail page for a train, seen from `station`.
pub fn train_href(train_id: &str, station: &str) -> String {
    format!(
        "/train/{}/{}",
        urlencoding::encode(train_id),
        urlencoding::encode(station)
    )
}

/// Path of the liveboard for `station` in `direction`.
pub fn board_href(station: &str, direction: Direction) -> String {
    format!(
        "/?station={}&arrdep={}",
        urlencoding::encode(station),
        direction.as_query()
    )
}

// ============================================================================
// Page Templates (extend base.html)
// ============================================================================

/// Liveboard page: search form, direction toggle and the board.
#[derive(Template)]
#[template(path = "liveboard.html")]
pub struct LiveboardTemplate {
    pub board: BoardView,
}

/// Train detail page: upcoming stops and composition.
#[derive(Template)]
#[template(path = "train.html")]
pub struct TrainTemplate {
    pub train: TrainDetailView,
}

// ============================================================================
// View Models (for templates and JSON)
// ============================================================================

/// Everything the liveboard page shows.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub station: String,
    pub search_text: String,
    pub direction: Direction,
    /// Label of the toggle, naming the direction it switches to
    pub toggle_label: &'static str,
    pub toggle_href: String,
    pub loading: bool,
    pub failed: bool,
    pub message: &'static str,
    pub rows: Vec<BoardRowView>,
}

impl BoardView {
    /// Render the view's current state, with times in `tz`.
    pub fn from_view<Tz>(view: &LiveboardView, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let rows = match view.phase() {
            Phase::Ready(board) => board
                .entries()
                .into_iter()
                .map(|e| BoardRowView::from_entry(e, tz))
                .collect(),
            _ => Vec::new(),
        };
        let failed = view.phase().is_failed();
        let toggled = view.direction().toggled();

        Self {
            station: view.station().to_string(),
            search_text: view.search_text().to_string(),
            direction: view.direction(),
            toggle_label: match toggled {
                Direction::Departures => "Show departures",
                Direction::Arrivals => "Show arrivals",
            },
            toggle_href: board_href(view.station(), toggled),
            loading: view.is_loading(),
            failed,
            message: if failed { FAILED_MESSAGE } else { "" },
            rows,
        }
    }

    pub fn is_arrivals(&self) -> bool {
        self.direction == Direction::Arrivals
    }
}

/// One row of the board.
#[derive(Debug, Clone, Serialize)]
pub struct BoardRowView {
    pub station: String,
    pub vehicle: String,
    pub time: String,
    pub href: String,
}

impl BoardRowView {
    pub fn from_entry<Tz>(entry: &dyn BoardEntry, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let station = entry.station().unwrap_or_default();
        Self {
            station: station.to_string(),
            vehicle: entry.short_name().unwrap_or_default().to_string(),
            time: clock(entry.time(), tz),
            href: train_href(entry.vehicle_id().unwrap_or_default(), station),
        }
    }
}

/// Everything the train detail page shows.
#[derive(Debug, Clone, Serialize)]
pub struct TrainDetailView {
    pub train_id: String,
    pub station: String,
    pub loading: bool,
    pub failed: bool,
    pub message: &'static str,
    pub stops: Vec<StopView>,
    pub segments: Vec<SegmentView>,
}

impl TrainDetailView {
    pub fn from_view<Tz>(view: &TrainView, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let (loading, failed) = match view.status() {
            TrainStatus::Loading => (true, false),
            TrainStatus::Failed => (false, true),
            TrainStatus::Ready { .. } => (false, false),
        };
        // Content only once both halves are in.
        let (stops, segments) = if loading || failed {
            (Vec::new(), Vec::new())
        } else {
            (
                view.upcoming_stops()
                    .iter()
                    .map(|s| StopView::from_stop(s, tz))
                    .collect(),
                view.segments().iter().map(SegmentView::from_segment).collect(),
            )
        };

        Self {
            train_id: view.train_id().to_string(),
            station: view.station().unwrap_or_default().to_string(),
            loading,
            failed,
            message: if failed { FAILED_MESSAGE } else { "" },
            stops,
            segments,
        }
    }
}

/// One upcoming stop.
#[derive(Debug, Clone, Serialize)]
pub struct StopView {
    pub name: String,
    pub delayed: bool,
    pub scheduled: String,
    /// `departureDelay` shown as a clock time; empty unless delayed
    pub delayed_time: String,
    pub platform: String,
}

impl StopView {
    pub fn from_stop<Tz>(stop: &Stop, tz: &Tz) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        let delayed = stop.is_delayed();
        Self {
            name: stop.station_name().unwrap_or_default().to_string(),
            delayed,
            scheduled: clock(stop.time.as_deref(), tz),
            delayed_time: if delayed {
                clock(stop.departure_delay.as_deref(), tz)
            } else {
                String::new()
            },
            platform: stop.platform.clone().unwrap_or_default(),
        }
    }
}

/// One composition segment.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentView {
    pub origin: String,
    pub destination: String,
    pub units: Vec<UnitView>,
}

impl SegmentView {
    pub fn from_segment(segment: &Segment) -> Self {
        let name = |s: Option<&StationInfo>| s.and_then(|s| s.name.clone()).unwrap_or_default();
        Self {
            origin: name(segment.origin.as_ref()),
            destination: name(segment.destination.as_ref()),
            units: segment
                .units()
                .iter()
                .enumerate()
                .map(|(i, u)| UnitView::from_unit(u, i))
                .collect(),
        }
    }
}

/// One carriage or locomotive.
#[derive(Debug, Clone, Serialize)]
pub struct UnitView {
    pub number: usize,
    pub material: String,
    pub toilets: bool,
    pub bike: bool,
    pub prm: bool,
    pub luggage: bool,
}

impl UnitView {
    pub fn from_unit(unit: &Unit, position: usize) -> Self {
        Self {
            number: unit.sequence_number(position),
            material: unit.material_sub_type_name.clone().unwrap_or_default(),
            toilets: unit.has_toilets(),
            bike: unit.has_bike_section(),
            prm: unit.has_prm_section(),
            luggage: unit.has_luggage_section(),
        }
    }
}
