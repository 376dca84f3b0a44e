//! iRail API response DTOs.
//!
//! These types map directly to the iRail JSON responses. Every field is
//! optional: iRail omits fields freely and sends most scalars as strings,
//! occasionally as bare numbers or booleans. [`lenient::text`] folds all
//! of those into `Option<String>` so a surprising scalar never fails a
//! whole board.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::IrailError;

mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Accept a string, number or boolean as text; anything else is `None`.
    pub fn text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::String(s)) => Some(s),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(if b { "1" } else { "0" }.to_string()),
            _ => None,
        })
    }
}

/// Whether a liveboard lists departures from or arrivals at a station.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Departures,
    Arrivals,
}

impl Direction {
    /// Value of the `arrdep` query parameter.
    pub fn as_query(self) -> &'static str {
        match self {
            Direction::Departures => "departures",
            Direction::Arrivals => "arrivals",
        }
    }

    /// Parse an `arrdep` value. Anything but `arrivals` means departures.
    pub fn from_query(s: &str) -> Self {
        if s.eq_ignore_ascii_case("arrivals") {
            Direction::Arrivals
        } else {
            Direction::Departures
        }
    }

    /// The opposite direction.
    pub fn toggled(self) -> Self {
        match self {
            Direction::Departures => Direction::Arrivals,
            Direction::Arrivals => Direction::Departures,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_query())
    }
}

/// A physical station.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StationInfo {
    #[serde(deserialize_with = "lenient::text")]
    pub id: Option<String>,

    /// Linked-data URI of the station.
    #[serde(rename = "@id", alias = "url", deserialize_with = "lenient::text")]
    pub url: Option<String>,

    /// Display name in the requested language.
    #[serde(deserialize_with = "lenient::text")]
    pub name: Option<String>,

    /// Canonical name, independent of language.
    #[serde(
        rename = "standardname",
        alias = "standardName",
        deserialize_with = "lenient::text"
    )]
    pub standard_name: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub location_x: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub location_y: Option<String>,
}

/// A train service.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VehicleInfo {
    /// Full identifier, e.g. `BE.NMBS.IC529`.
    #[serde(deserialize_with = "lenient::text")]
    pub name: Option<String>,

    /// Human-facing name, e.g. `IC 529`.
    #[serde(rename = "shortname", deserialize_with = "lenient::text")]
    pub short_name: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub number: Option<String>,

    #[serde(rename = "type", deserialize_with = "lenient::text")]
    pub vehicle_type: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub location_x: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub location_y: Option<String>,

    #[serde(rename = "@id", alias = "url", deserialize_with = "lenient::text")]
    pub url: Option<String>,
}

/// One row of a departures board.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Departure {
    #[serde(deserialize_with = "lenient::text")]
    pub id: Option<String>,

    /// Destination of the departing train.
    #[serde(deserialize_with = "lenient::text")]
    pub station: Option<String>,

    #[serde(rename = "stationinfo", alias = "stationInfo")]
    pub station_info: Option<StationInfo>,

    #[serde(deserialize_with = "lenient::text")]
    pub vehicle: Option<String>,

    #[serde(rename = "vehicleinfo", alias = "vehicleInfo")]
    pub vehicle_info: Option<VehicleInfo>,

    /// Scheduled Unix timestamp, in seconds.
    #[serde(deserialize_with = "lenient::text")]
    pub time: Option<String>,

    /// Delay in seconds.
    #[serde(deserialize_with = "lenient::text")]
    pub delay: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub canceled: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub platform: Option<String>,
}

/// One row of an arrivals board.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Arrival {
    #[serde(deserialize_with = "lenient::text")]
    pub id: Option<String>,

    /// Origin of the arriving train.
    #[serde(deserialize_with = "lenient::text")]
    pub station: Option<String>,

    #[serde(rename = "stationinfo", alias = "stationInfo")]
    pub station_info: Option<StationInfo>,

    #[serde(deserialize_with = "lenient::text")]
    pub vehicle: Option<String>,

    #[serde(rename = "vehicleinfo", alias = "vehicleInfo")]
    pub vehicle_info: Option<VehicleInfo>,

    /// Scheduled Unix timestamp, in seconds.
    #[serde(deserialize_with = "lenient::text")]
    pub time: Option<String>,

    /// Delay in seconds.
    #[serde(deserialize_with = "lenient::text")]
    pub delay: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub canceled: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub arrived: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub platform: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub is_extra: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub departure_connection: Option<String>,
}

/// Accessors shared by departure and arrival rows.
pub trait BoardEntry {
    fn station(&self) -> Option<&str>;
    fn vehicle(&self) -> Option<&str>;
    fn vehicle_info(&self) -> Option<&VehicleInfo>;
    fn time(&self) -> Option<&str>;

    /// Identifier used to look the train up on the vehicle endpoint.
    ///
    /// Falls back from the vehicle info name to the bare vehicle field,
    /// then to the short name.
    fn vehicle_id(&self) -> Option<&str> {
        self.vehicle_info()
            .and_then(|v| v.name.as_deref())
            .or(self.vehicle())
            .or_else(|| self.short_name())
    }

    fn short_name(&self) -> Option<&str> {
        self.vehicle_info().and_then(|v| v.short_name.as_deref())
    }
}

macro_rules! impl_board_entry {
    ($ty:ty) => {
        impl BoardEntry for $ty {
            fn station(&self) -> Option<&str> {
                self.station.as_deref()
            }

            fn vehicle(&self) -> Option<&str> {
                self.vehicle.as_deref()
            }

            fn vehicle_info(&self) -> Option<&VehicleInfo> {
                self.vehicle_info.as_ref()
            }

            fn time(&self) -> Option<&str> {
                self.time.as_deref()
            }
        }
    };
}

impl_board_entry!(Departure);
impl_board_entry!(Arrival);

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct DepartureList {
    departure: Vec<Departure>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ArrivalList {
    arrival: Vec<Arrival>,
}

/// Raw response from the liveboard endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LiveboardResponse {
    #[serde(deserialize_with = "lenient::text")]
    pub station: Option<String>,

    #[serde(rename = "stationinfo", alias = "stationInfo")]
    pub station_info: Option<StationInfo>,

    departures: Option<DepartureList>,

    arrivals: Option<ArrivalList>,
}

/// The board for one queried station, in one direction.
#[derive(Debug, Clone, PartialEq)]
pub enum LiveboardResult {
    Departures(Vec<Departure>),
    Arrivals(Vec<Arrival>),
}

impl LiveboardResult {
    /// Pick the list matching `direction` out of a raw response.
    ///
    /// A response without the expected list is a parse error; an
    /// expected list with no rows is an empty board.
    pub fn from_response(
        response: LiveboardResponse,
        direction: Direction,
    ) -> Result<Self, IrailError> {
        match direction {
            Direction::Departures => response
                .departures
                .map(|d| LiveboardResult::Departures(d.departure))
                .ok_or_else(|| IrailError::missing("departures")),
            Direction::Arrivals => response
                .arrivals
                .map(|a| LiveboardResult::Arrivals(a.arrival))
                .ok_or_else(|| IrailError::missing("arrivals")),
        }
    }

    pub fn direction(&self) -> Direction {
        match self {
            LiveboardResult::Departures(_) => Direction::Departures,
            LiveboardResult::Arrivals(_) => Direction::Arrivals,
        }
    }

    /// Rows in source order.
    pub fn entries(&self) -> Vec<&dyn BoardEntry> {
        match self {
            LiveboardResult::Departures(d) => d.iter().map(|e| e as &dyn BoardEntry).collect(),
            LiveboardResult::Arrivals(a) => a.iter().map(|e| e as &dyn BoardEntry).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            LiveboardResult::Departures(d) => d.len(),
            LiveboardResult::Arrivals(a) => a.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One stop along a train's route.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Stop {
    #[serde(deserialize_with = "lenient::text")]
    pub id: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub station: Option<String>,

    #[serde(rename = "stationinfo", alias = "stationInfo")]
    pub station_info: Option<StationInfo>,

    /// Scheduled Unix timestamp, in seconds.
    #[serde(deserialize_with = "lenient::text")]
    pub time: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub platform: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub delay: Option<String>,

    #[serde(alias = "departuredelay", deserialize_with = "lenient::text")]
    pub departure_delay: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub canceled: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub departure_canceled: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub arrival_delay: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub arrival_canceled: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub scheduled_departure_time: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub scheduled_arrival_time: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub is_extra_stop: Option<String>,
}

impl Stop {
    /// Station name, preferring the station info's display name.
    pub fn station_name(&self) -> Option<&str> {
        self.station_info
            .as_ref()
            .and_then(|s| s.name.as_deref())
            .or(self.station.as_deref())
    }

    /// The stop's delay flag is the literal string `"1"`.
    pub fn is_delayed(&self) -> bool {
        self.delay.as_deref() == Some("1")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct StopList {
    stop: Vec<Stop>,
}

/// Response from the vehicle endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrainInfo {
    #[serde(deserialize_with = "lenient::text")]
    pub vehicle: Option<String>,

    #[serde(rename = "vehicleinfo", alias = "vehicleInfo")]
    pub vehicle_info: Option<VehicleInfo>,

    stops: Option<StopList>,

    #[serde(deserialize_with = "lenient::text")]
    pub delay: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub canceled: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub departure_delay: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub departure_canceled: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub arrival_delay: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub arrival_canceled: Option<String>,
}

impl TrainInfo {
    /// Build a train from its stops, in route order.
    pub fn with_stops(stops: Vec<Stop>) -> Self {
        Self {
            stops: Some(StopList { stop: stops }),
            ..Self::default()
        }
    }

    /// Stops in route order; empty when the API sent none.
    pub fn stops(&self) -> &[Stop] {
        self.stops.as_ref().map_or(&[], |s| s.stop.as_slice())
    }
}

/// One rolling-stock unit (coach or locomotive).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Unit {
    /// Zero-based position within the segment, as a string.
    #[serde(deserialize_with = "lenient::text")]
    pub id: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub has_toilets: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub has_bike_section: Option<String>,

    /// Section for passengers with reduced mobility.
    #[serde(deserialize_with = "lenient::text")]
    pub has_prm_section: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub has_luggage_section: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub has_second_class_outlets: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub has_first_class_outlets: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub has_heating: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub has_airco: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub has_priority_places: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub material_number: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub material_sub_type_name: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub traction_type: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub traction_position: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub can_pass_to_next_unit: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub seats_first_class: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub seats_second_class: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub standing_places_second_class: Option<String>,

    #[serde(deserialize_with = "lenient::text")]
    pub length_in_meter: Option<String>,
}

/// A capability field counts as set when it is non-empty and not an
/// explicit "no" (`"0"` or `"false"`).
pub fn flag_is_set(value: Option<&str>) -> bool {
    match value.map(str::trim) {
        None | Some("") | Some("0") => false,
        Some(v) => !v.eq_ignore_ascii_case("false"),
    }
}

impl Unit {
    pub fn has_toilets(&self) -> bool {
        flag_is_set(self.has_toilets.as_deref())
    }

    pub fn has_bike_section(&self) -> bool {
        flag_is_set(self.has_bike_section.as_deref())
    }

    pub fn has_prm_section(&self) -> bool {
        flag_is_set(self.has_prm_section.as_deref())
    }

    pub fn has_luggage_section(&self) -> bool {
        flag_is_set(self.has_luggage_section.as_deref())
    }

    /// 1-based sequence number: the unit's id plus one, or its position
    /// plus one when the id is missing or not a number.
    pub fn sequence_number(&self, position: usize) -> usize {
        self.id
            .as_deref()
            .and_then(|id| id.trim().parse::<usize>().ok())
            .unwrap_or(position)
            + 1
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct UnitList {
    unit: Vec<Unit>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct SegmentComposition {
    #[serde(deserialize_with = "lenient::text")]
    source: Option<String>,
    units: Option<UnitList>,
}

/// A stretch of the route run with one composition.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Segment {
    #[serde(deserialize_with = "lenient::text")]
    pub id: Option<String>,

    pub origin: Option<StationInfo>,

    pub destination: Option<StationInfo>,

    composition: Option<SegmentComposition>,
}

impl Segment {
    pub fn new(origin: StationInfo, destination: StationInfo, units: Vec<Unit>) -> Self {
        Self {
            id: None,
            origin: Some(origin),
            destination: Some(destination),
            composition: Some(SegmentComposition {
                source: None,
                units: Some(UnitList { unit: units }),
            }),
        }
    }

    /// Units in train order; empty when the API sent none.
    pub fn units(&self) -> &[Unit] {
        self.composition
            .as_ref()
            .and_then(|c| c.units.as_ref())
            .map_or(&[], |u| u.unit.as_slice())
    }

    /// Where the composition data came from (e.g. `Atlas`).
    pub fn source(&self) -> Option<&str> {
        self.composition.as_ref().and_then(|c| c.source.as_deref())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct SegmentList {
    segment: Vec<Segment>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
struct CompositionBody {
    segments: Option<SegmentList>,
}

/// Response from the composition endpoint.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct TrainComposition {
    composition: Option<CompositionBody>,
}

impl TrainComposition {
    pub fn with_segments(segments: Vec<Segment>) -> Self {
        Self {
            composition: Some(CompositionBody {
                segments: Some(SegmentList { segment: segments }),
            }),
        }
    }

    /// Segments in route order; empty when the API sent none.
    pub fn segments(&self) -> &[Segment] {
        self.composition
            .as_ref()
            .and_then(|c| c.segments.as_ref())
            .map_or(&[], |s| s.segment.as_slice())
    }
}
